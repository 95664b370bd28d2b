//! Overlay merge errors

use super::CharmbundleError;

/// Creates an overlay missing charm error
pub fn missing_charm(application: impl Into<String>) -> CharmbundleError {
    CharmbundleError::OverlayMissingCharm {
        application: application.into(),
    }
}

/// Creates an invalid overlay error
pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> CharmbundleError {
    CharmbundleError::OverlayInvalid {
        path: path.into(),
        reason: reason.into(),
    }
}
