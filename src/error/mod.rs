//! Error types and handling for charmbundle
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bundle`]: Bundle loading and lookup errors
//! - [`overlay`]: Overlay merge errors
//! - [`config`]: Check configuration errors
//! - [`fs`]: File system errors
//! - [`cli`]: Command line argument errors

pub mod bundle;
pub mod cli;
pub mod config;
pub mod fs;
pub mod overlay;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for charmbundle operations
#[derive(Error, Diagnostic, Debug)]
pub enum CharmbundleError {
    // Bundle errors
    #[error("Failed to parse bundle '{path}': {reason}")]
    #[diagnostic(
        code(charmbundle::bundle::parse_failed),
        help("Bundles are YAML mappings with 'machines', 'applications' and 'relations' keys")
    )]
    BundleParseFailed { path: String, reason: String },

    #[error("Bundle '{path}' is empty")]
    #[diagnostic(code(charmbundle::bundle::empty))]
    BundleEmpty { path: String },

    #[error("Bundle '{path}' is not a mapping")]
    #[diagnostic(
        code(charmbundle::bundle::not_mapping),
        help("The top level of a bundle document must be a YAML mapping")
    )]
    BundleNotMapping { path: String },

    #[error("Application '{name}' not found in bundle")]
    #[diagnostic(
        code(charmbundle::bundle::application_not_found),
        help("Run 'charmbundle list <BUNDLE> applications' to see the declared applications")
    )]
    ApplicationNotFound { name: String },

    #[error("No application name given")]
    #[diagnostic(
        code(charmbundle::bundle::application_required),
        help("Pass an application name, or run from an interactive terminal to pick one")
    )]
    ApplicationNameRequired,

    #[error("No bundle files found under '{path}'")]
    #[diagnostic(
        code(charmbundle::bundle::none_found),
        help("Bundle files must end in .yaml or .yml")
    )]
    NoBundlesFound { path: String },

    #[error("Validation failed for {failed} bundle(s)")]
    #[diagnostic(code(charmbundle::bundle::validation_failed))]
    ValidationFailed { failed: usize },

    #[error("Failed to render bundle: {reason}")]
    #[diagnostic(code(charmbundle::bundle::render_failed))]
    RenderFailed { reason: String },

    // Overlay errors
    #[error("Overlay adds application '{application}' without a charm")]
    #[diagnostic(
        code(charmbundle::overlay::missing_charm),
        help("Applications introduced by an overlay must name their charm")
    )]
    OverlayMissingCharm { application: String },

    #[error("Invalid overlay '{path}': {reason}")]
    #[diagnostic(code(charmbundle::overlay::invalid))]
    OverlayInvalid { path: String, reason: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(charmbundle::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(charmbundle::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(charmbundle::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(charmbundle::config::invalid))]
    ConfigInvalid { message: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(charmbundle::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    #[error("Invalid filter pattern '{pattern}': {reason}")]
    #[diagnostic(
        code(charmbundle::cli::invalid_filter),
        help("Filters are glob patterns such as 'ovn-*'")
    )]
    InvalidFilter { pattern: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(charmbundle::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(charmbundle::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(charmbundle::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for CharmbundleError {
    fn from(err: std::io::Error) -> Self {
        CharmbundleError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CharmbundleError {
    fn from(err: serde_yaml::Error) -> Self {
        CharmbundleError::BundleParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CharmbundleError {
    fn from(err: serde_json::Error) -> Self {
        CharmbundleError::RenderFailed {
            reason: err.to_string(),
        }
    }
}

impl From<walkdir::Error> for CharmbundleError {
    fn from(err: walkdir::Error) -> Self {
        CharmbundleError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for CharmbundleError {
    fn from(err: inquire::InquireError) -> Self {
        CharmbundleError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CharmbundleError>;
