//! charmbundle - charm bundle loading and validation
//!
//! A bundle describes a whole deployment: the machines to provision, the
//! applications (charms) to run on them, and the relations that wire the
//! applications together. This crate loads bundle YAML into a typed
//! [`model::Bundle`], resolving anchors, includes and overlays on the way,
//! and checks it for the mistakes an orchestrator would only report at
//! deploy time.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let bundle = charmbundle::loader::load_file(Path::new("bundle.yaml"))?;
//! let report = charmbundle::validate::check(&bundle, &charmbundle::config::CheckConfig::default());
//! for finding in &report.findings {
//!     println!("{finding}");
//! }
//! # Ok::<(), charmbundle::error::CharmbundleError>(())
//! ```

pub mod charm;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constraints;
pub mod error;
pub mod loader;
pub mod logging;
pub mod mappings;
pub mod model;
pub mod overlay;
pub mod placement;
pub mod ui;
pub mod validate;

pub use error::{CharmbundleError, Result};
pub use model::Bundle;
