//! Command line argument errors

use super::CharmbundleError;

/// Creates an unknown shell error
pub fn unknown_shell(shell: impl Into<String>) -> CharmbundleError {
    CharmbundleError::UnknownShell {
        shell: shell.into(),
    }
}

/// Creates an invalid filter error
pub fn invalid_filter(pattern: impl Into<String>, reason: impl Into<String>) -> CharmbundleError {
    CharmbundleError::InvalidFilter {
        pattern: pattern.into(),
        reason: reason.into(),
    }
}
