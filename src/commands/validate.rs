//! Validate command implementation
//!
//! Loads every bundle named on the command line (directories are walked for
//! `*.yaml`/`*.yml`), runs the checks and prints a report per bundle. A
//! bundle that fails to load counts as failed; the remaining bundles are
//! still checked.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::cli::{ReportFormat, ValidateArgs};
use crate::commands::helpers;
use crate::config::CheckConfig;
use crate::error::{Result, bundle};
use crate::ui::display;
use crate::validate::{self, Report};

/// Result of checking one bundle file
#[derive(Debug, Serialize)]
struct BundleOutcome {
    path: PathBuf,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_error: Option<String>,
    #[serde(flatten)]
    report: Report,
}

impl BundleOutcome {
    fn checked(path: PathBuf, report: Report) -> Self {
        Self {
            path,
            passed: !report.has_errors(),
            load_error: None,
            report,
        }
    }

    fn load_failed(path: PathBuf, reason: String) -> Self {
        Self {
            path,
            passed: false,
            load_error: Some(reason),
            report: Report::default(),
        }
    }
}

/// Run validate command
pub fn run(config_path: Option<PathBuf>, args: ValidateArgs) -> Result<()> {
    let working_dir = helpers::current_dir()?;
    let (config, source) = CheckConfig::discover(config_path.as_deref(), &working_dir)?;
    if let Some(source) = source {
        debug!(config = %source.display(), "loaded check config");
    }
    let config = config.with_overrides(args.strict, &args.ignore);
    config.validate()?;

    let files = collect_bundle_files(&args.paths)?;
    let outcomes: Vec<BundleOutcome> = files
        .into_iter()
        .map(|path| check_file(path, &args.overlays, &config))
        .collect();

    match args.format {
        ReportFormat::Text => print_text(&outcomes),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
    }

    let failed = outcomes.iter().filter(|outcome| !outcome.passed).count();
    if failed > 0 {
        return Err(bundle::validation_failed(failed));
    }
    Ok(())
}

fn check_file(path: PathBuf, overlays: &[PathBuf], config: &CheckConfig) -> BundleOutcome {
    match helpers::load_bundle(&path, overlays) {
        Ok(loaded) => {
            let report = validate::check(&loaded, config);
            BundleOutcome::checked(path, report)
        }
        Err(e) => {
            warn!(bundle = %path.display(), error = %e, "bundle failed to load");
            BundleOutcome::load_failed(path, e.to_string())
        }
    }
}

/// Expand directories into the bundle files they contain
///
/// Files named explicitly are kept whatever their extension. Hidden entries
/// and `overlays` directories inside walked directories are skipped; pass
/// overlay files with `--overlay` instead.
fn collect_bundle_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = Vec::new();
        let walker = WalkDir::new(path)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && is_bundle_file(entry.path()) {
                found.push(entry.into_path());
            }
        }
        if found.is_empty() {
            return Err(bundle::none_found(path.display().to_string()));
        }
        found.sort();
        debug!(dir = %path.display(), count = found.len(), "found bundle files");
        files.extend(found);
    }
    Ok(files)
}

/// Directories that hold overlay fragments rather than bundles
const OVERLAY_DIR_NAME: &str = "overlays";

fn is_skipped(entry: &walkdir::DirEntry) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    name.starts_with('.') || (entry.file_type().is_dir() && name == OVERLAY_DIR_NAME)
}

fn is_bundle_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

fn print_text(outcomes: &[BundleOutcome]) {
    for outcome in outcomes {
        match &outcome.load_error {
            Some(reason) => display::display_load_failure(&outcome.path, reason),
            None => display::display_report(&outcome.path, &outcome.report),
        }
    }

    if outcomes.len() > 1 {
        let failed = outcomes.iter().filter(|outcome| !outcome.passed).count();
        println!();
        println!(
            "Checked {} bundle(s): {} passed, {} failed",
            outcomes.len(),
            outcomes.len() - failed,
            failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_bundle_file() {
        assert!(is_bundle_file(Path::new("bundle.yaml")));
        assert!(is_bundle_file(Path::new("overlay.YML")));
        assert!(!is_bundle_file(Path::new("README.md")));
        assert!(!is_bundle_file(Path::new("bundle")));
    }

    #[test]
    fn test_collect_walks_directories_sorted() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("nested")).unwrap();
        std::fs::write(temp.path().join("b.yaml"), "applications: {}").unwrap();
        std::fs::write(temp.path().join("a.yml"), "applications: {}").unwrap();
        std::fs::write(temp.path().join("nested/c.yaml"), "applications: {}").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "not a bundle").unwrap();

        let files = collect_bundle_files(&[temp.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.strip_prefix(temp.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.yml", "b.yaml", "nested/c.yaml"]);
    }

    #[test]
    fn test_collect_skips_hidden_entries() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("bundle.yaml"), "applications: {}").unwrap();
        std::fs::write(temp.path().join(".charmbundle.yaml"), "strict: true").unwrap();
        std::fs::create_dir_all(temp.path().join(".git")).unwrap();
        std::fs::write(temp.path().join(".git/config.yaml"), "x: 1").unwrap();

        let files = collect_bundle_files(&[temp.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![temp.path().join("bundle.yaml")]);
    }

    #[test]
    fn test_collect_skips_overlay_directories() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("focal/overlays")).unwrap();
        std::fs::write(temp.path().join("focal/bundle.yaml"), "applications: {}").unwrap();
        std::fs::write(temp.path().join("focal/overlays/ha.yaml"), "applications: {}").unwrap();
        std::fs::write(temp.path().join("overlays.yaml"), "applications: {}").unwrap();

        let files = collect_bundle_files(&[temp.path().to_path_buf()]).unwrap();
        assert_eq!(
            files,
            vec![
                temp.path().join("focal/bundle.yaml"),
                temp.path().join("overlays.yaml"),
            ]
        );
    }

    #[test]
    fn test_collect_overlay_directory_given_directly() {
        let temp = TempDir::new().unwrap();
        let overlays = temp.path().join("overlays");
        std::fs::create_dir_all(&overlays).unwrap();
        std::fs::write(overlays.join("ha.yaml"), "applications: {}").unwrap();

        let files = collect_bundle_files(&[overlays.clone()]).unwrap();
        assert_eq!(files, vec![overlays.join("ha.yaml")]);
    }

    #[test]
    fn test_collect_empty_directory_fails() {
        let temp = TempDir::new().unwrap();
        assert!(collect_bundle_files(&[temp.path().to_path_buf()]).is_err());
    }

    #[test]
    fn test_collect_keeps_explicit_files() {
        let files = collect_bundle_files(&[PathBuf::from("does-not-exist.yaml")]).unwrap();
        assert_eq!(files, vec![PathBuf::from("does-not-exist.yaml")]);
    }

    #[test]
    fn test_load_failure_outcome() {
        let outcome = check_file(
            PathBuf::from("does-not-exist.yaml"),
            &[],
            &CheckConfig::default(),
        );
        assert!(!outcome.passed);
        assert!(outcome.load_error.is_some());
    }
}
