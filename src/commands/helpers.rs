//! Command helper utilities

use std::path::{Path, PathBuf};
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{Result, cli, fs};
use crate::loader;
use crate::model::Bundle;

/// Current working directory, as an IO error when it is gone
pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|e| fs::io_error(format!("Failed to get current directory: {e}")))
}

/// Load a bundle with the overlays given on the command line
pub fn load_bundle(path: &Path, overlays: &[PathBuf]) -> Result<Bundle> {
    loader::load_with_overlays(path, overlays)
}

/// Compiled `--filter` glob
pub struct NameFilter<'p> {
    glob: Option<Glob<'p>>,
}

impl<'p> NameFilter<'p> {
    pub fn new(pattern: Option<&'p str>) -> Result<Self> {
        let glob = pattern
            .map(|p| Glob::new(p).map_err(|e| cli::invalid_filter(p, e.to_string())))
            .transpose()?;
        Ok(Self { glob })
    }

    /// True when no filter was given or `name` matches it
    pub fn matches(&self, name: &str) -> bool {
        self.glob
            .as_ref()
            .is_none_or(|glob| glob.is_match(CandidatePath::from(name)))
    }
}
