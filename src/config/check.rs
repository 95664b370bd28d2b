//! Check configuration (.charmbundle.yaml)
//!
//! ```yaml
//! strict: true
//! ignore:
//!   - machine-unused
//!   - relation-*
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, config};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".charmbundle.yaml";

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "CHARMBUNDLE_CONFIG";

/// Settings for [`crate::validate::check`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Report warnings as errors
    #[serde(default)]
    pub strict: bool,

    /// Rule codes to skip; glob patterns are allowed
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl CheckConfig {
    /// Parse check configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::parse(yaml, "<input>")
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| config::parse_failed(origin, &e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load check configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(config::not_found(path));
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| config::read_failed(path, &e))?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Find and load the configuration that applies
    ///
    /// An explicit path (from `--config` or `CHARMBUNDLE_CONFIG`) must
    /// exist. Otherwise `.charmbundle.yaml` in `working_dir`, then
    /// `<config dir>/charmbundle/config.yaml`, then defaults.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "using explicit check config");
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        for candidate in candidate_paths(working_dir) {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "using discovered check config");
                return Ok((Self::from_file(&candidate)?, Some(candidate)));
            }
        }

        debug!("no check config found, using defaults");
        Ok((Self::default(), None))
    }

    /// Apply command line overrides
    #[must_use]
    pub fn with_overrides(mut self, strict: bool, ignore: &[String]) -> Self {
        self.strict |= strict;
        for code in ignore {
            if !self.ignore.contains(code) {
                self.ignore.push(code.clone());
            }
        }
        self
    }

    /// Validate check configuration
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignore {
            if pattern.trim().is_empty() {
                return Err(config::empty_ignore_pattern());
            }
            if let Err(e) = wax::Glob::new(pattern) {
                return Err(config::invalid_ignore_pattern(pattern, e));
            }
        }
        Ok(())
    }
}

fn candidate_paths(working_dir: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![working_dir.join(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("charmbundle").join("config.yaml"));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_yaml() {
        let config = CheckConfig::from_yaml("strict: true\nignore: [machine-unused]\n").unwrap();
        assert!(config.strict);
        assert_eq!(config.ignore, vec!["machine-unused"]);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(CheckConfig::from_yaml("").unwrap(), CheckConfig::default());
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let err = CheckConfig::from_yaml("ignore: ['relation-{']\n").unwrap_err();
        assert!(matches!(
            err,
            crate::error::CharmbundleError::ConfigInvalid { .. }
        ));
        assert!(err.to_string().contains("'relation-{'"));
    }

    #[test]
    fn test_inline_parse_error_names_input() {
        let err = CheckConfig::from_yaml("strict: [not, a, bool]\n").unwrap_err();
        let crate::error::CharmbundleError::ConfigParseFailed { path, .. } = err else {
            panic!("expected parse failure");
        };
        assert_eq!(path, "<input>");
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "strict: [not, a, bool]\n").unwrap();
        let err = CheckConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_discover_working_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "strict: true\n").unwrap();
        let (config, path) = CheckConfig::discover(None, temp.path()).unwrap();
        assert!(config.strict);
        assert_eq!(path, Some(temp.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_discover_explicit_missing() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.yaml");
        assert!(matches!(
            CheckConfig::discover(Some(&missing), temp.path()),
            Err(crate::error::CharmbundleError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_with_overrides() {
        let config = CheckConfig {
            strict: false,
            ignore: vec!["machine-unused".to_string()],
        }
        .with_overrides(true, &["machine-unused".to_string(), "series-*".to_string()]);
        assert!(config.strict);
        assert_eq!(config.ignore, vec!["machine-unused", "series-*"]);
    }
}
