//! Check configuration errors
//!
//! Every constructor names the file (or `<input>`) the settings came from.

use std::fmt::Display;
use std::path::Path;

use super::CharmbundleError;

/// A config path given explicitly that does not exist
pub fn not_found(path: &Path) -> CharmbundleError {
    CharmbundleError::ConfigNotFound {
        path: path.display().to_string(),
    }
}

pub fn read_failed(path: &Path, err: &std::io::Error) -> CharmbundleError {
    CharmbundleError::ConfigReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// YAML that does not describe a check configuration
pub fn parse_failed(origin: &str, err: &serde_yaml::Error) -> CharmbundleError {
    CharmbundleError::ConfigParseFailed {
        path: origin.to_string(),
        reason: err.to_string(),
    }
}

pub fn empty_ignore_pattern() -> CharmbundleError {
    CharmbundleError::ConfigInvalid {
        message: "ignore patterns cannot be empty".to_string(),
    }
}

/// An ignore entry wax cannot compile
pub fn invalid_ignore_pattern(pattern: &str, reason: impl Display) -> CharmbundleError {
    CharmbundleError::ConfigInvalid {
        message: format!("ignore pattern '{pattern}' is not a valid glob: {reason}"),
    }
}
