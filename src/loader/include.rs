//! `include-file://` and `include-base64://` option values
//!
//! The orchestrator's client inlines these before deployment. Paths are
//! relative to the directory of the document that names them.

use base64::Engine;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, fs};

pub const INCLUDE_FILE: &str = "include-file://";
pub const INCLUDE_BASE64: &str = "include-base64://";

/// Replace include directives in every application's options
pub fn expand(document: &mut Value, base_dir: &Path) -> Result<()> {
    let Some(applications) = document
        .as_mapping_mut()
        .and_then(|root| {
            if root.contains_key("applications") {
                root.get_mut("applications")
            } else {
                root.get_mut("services")
            }
        })
        .and_then(Value::as_mapping_mut)
    else {
        return Ok(());
    };

    for (_, application) in applications.iter_mut() {
        let Some(options) = application
            .as_mapping_mut()
            .and_then(|app| app.get_mut("options"))
            .and_then(Value::as_mapping_mut)
        else {
            continue;
        };

        for (_, value) in options.iter_mut() {
            if let Some(expanded) = expand_value(value, base_dir)? {
                *value = Value::String(expanded);
            }
        }
    }

    Ok(())
}

fn expand_value(value: &Value, base_dir: &Path) -> Result<Option<String>> {
    let Some(text) = value.as_str() else {
        return Ok(None);
    };

    if let Some(target) = text.strip_prefix(INCLUDE_FILE) {
        let content = read_include(base_dir, target)?;
        return Ok(Some(String::from_utf8_lossy(&content).into_owned()));
    }

    if let Some(target) = text.strip_prefix(INCLUDE_BASE64) {
        let content = read_include(base_dir, target)?;
        return Ok(Some(
            base64::engine::general_purpose::STANDARD.encode(content),
        ));
    }

    Ok(None)
}

fn read_include(base_dir: &Path, target: &str) -> Result<Vec<u8>> {
    let path = base_dir.join(target);
    debug!(path = %path.display(), "reading include");
    std::fs::read(&path).map_err(|e| fs::read_failed(path.display().to_string(), e.to_string()))
}
