//! Bundle loading and lookup errors

use super::CharmbundleError;

/// Creates a bundle parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> CharmbundleError {
    CharmbundleError::BundleParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an empty bundle error
pub fn empty(path: impl Into<String>) -> CharmbundleError {
    CharmbundleError::BundleEmpty { path: path.into() }
}

/// Creates a not-a-mapping error
pub fn not_mapping(path: impl Into<String>) -> CharmbundleError {
    CharmbundleError::BundleNotMapping { path: path.into() }
}

/// Creates an application not found error
pub fn application_not_found(name: impl Into<String>) -> CharmbundleError {
    CharmbundleError::ApplicationNotFound { name: name.into() }
}

/// Creates a no bundles found error
pub fn none_found(path: impl Into<String>) -> CharmbundleError {
    CharmbundleError::NoBundlesFound { path: path.into() }
}

/// Creates a validation failed error
pub fn validation_failed(failed: usize) -> CharmbundleError {
    CharmbundleError::ValidationFailed { failed }
}

/// Creates a render failed error
pub fn render_failed(reason: impl Into<String>) -> CharmbundleError {
    CharmbundleError::RenderFailed {
        reason: reason.into(),
    }
}
