//! Render command implementation
//!
//! Prints the bundle as the orchestrator would see it: anchors expanded,
//! includes inlined and overlays applied.

use crate::cli::{RenderArgs, RenderFormat};
use crate::commands::helpers;
use crate::error::{Result, bundle};
use crate::model::Bundle;

pub fn run(args: RenderArgs) -> Result<()> {
    let loaded = helpers::load_bundle(&args.bundle, &args.overlays)?;
    print!("{}", render(&loaded, args.format)?);
    Ok(())
}

/// Serialize a bundle in the requested format
pub fn render(loaded: &Bundle, format: RenderFormat) -> Result<String> {
    match format {
        RenderFormat::Yaml => {
            serde_yaml::to_string(loaded).map_err(|e| bundle::render_failed(e.to_string()))
        }
        RenderFormat::Json => {
            let mut json = serde_json::to_string_pretty(loaded)?;
            json.push('\n');
            Ok(json)
        }
    }
}
