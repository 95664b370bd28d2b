//! Loading bundle documents from text and files
//!
//! Loading happens in stages, all on raw YAML values:
//! 1. split the text into YAML documents; the first is the bundle, any
//!    further documents are overlays
//! 2. expand `include-file://` and `include-base64://` option values,
//!    relative to the directory of the file each document came from
//! 3. apply overlays in order, then overlay files in order
//! 4. deserialize into [`Bundle`], which rejects duplicate keys
//!
//! YAML anchors and aliases are resolved by the parser in stage 1.

pub mod include;

use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, bundle, fs};
use crate::model::Bundle;
use crate::overlay;

/// Parse a bundle from text
///
/// `base_dir` anchors relative include paths; the current directory is used
/// when it is `None`.
pub fn load_str(content: &str, base_dir: Option<&Path>) -> Result<Bundle> {
    let base_dir = base_dir.unwrap_or_else(|| Path::new("."));
    let document = resolve_documents(content, "<input>", base_dir)?;
    into_bundle(document, "<input>")
}

/// Parse a bundle file
pub fn load_file(path: &Path) -> Result<Bundle> {
    load_with_overlays(path, &[])
}

/// Parse a bundle file and apply overlay files on top, in order
pub fn load_with_overlays(path: &Path, overlays: &[PathBuf]) -> Result<Bundle> {
    let origin = path.display().to_string();
    info!(bundle = %origin, overlays = overlays.len(), "loading bundle");

    let content = read(path)?;
    let mut document = resolve_documents(&content, &origin, parent_dir(path))?;

    for overlay_path in overlays {
        let overlay_origin = overlay_path.display().to_string();
        debug!(overlay = %overlay_origin, "applying overlay file");
        let overlay_content = read(overlay_path)?;
        for overlay_doc in parse_documents(&overlay_content, &overlay_origin)? {
            let overlay_doc = with_includes(overlay_doc, parent_dir(overlay_path))?;
            overlay::apply(&mut document, overlay_doc, &overlay_origin)?;
        }
    }

    into_bundle(document, &origin)
}

fn read(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(fs::not_found(path.display().to_string()));
    }
    std::fs::read_to_string(path)
        .map_err(|e| fs::read_failed(path.display().to_string(), e.to_string()))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn parse_documents(content: &str, origin: &str) -> Result<Vec<Value>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value =
            Value::deserialize(document).map_err(|e| bundle::parse_failed(origin, e.to_string()))?;
        documents.push(value);
    }
    debug!(origin, documents = documents.len(), "parsed YAML documents");
    Ok(documents)
}

fn with_includes(mut document: Value, base_dir: &Path) -> Result<Value> {
    include::expand(&mut document, base_dir)?;
    Ok(document)
}

/// Parse every document, apply in-file overlays, return the merged value
fn resolve_documents(content: &str, origin: &str, base_dir: &Path) -> Result<Value> {
    let mut documents = parse_documents(content, origin)?.into_iter();
    let base = match documents.next() {
        None | Some(Value::Null) => return Err(bundle::empty(origin)),
        Some(Value::Mapping(mapping)) => Value::Mapping(mapping),
        Some(_) => return Err(bundle::not_mapping(origin)),
    };

    let mut merged = with_includes(base, base_dir)?;
    for (index, overlay_doc) in documents.enumerate() {
        debug!(origin, document = index + 2, "applying in-file overlay");
        let overlay_doc = with_includes(overlay_doc, base_dir)?;
        overlay::apply(&mut merged, overlay_doc, origin)?;
    }
    Ok(merged)
}

fn into_bundle(document: Value, origin: &str) -> Result<Bundle> {
    let bundle: Bundle =
        serde_yaml::from_value(document).map_err(|e| bundle::parse_failed(origin, e.to_string()))?;

    debug!(
        origin,
        machines = bundle.machines.len(),
        applications = bundle.applications.len(),
        relations = bundle.relations.len(),
        "bundle loaded"
    );
    Ok(bundle)
}
