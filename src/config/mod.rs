//! Configuration file handling for charmbundle
//!
//! This module contains data structures for:
//! - `.charmbundle.yaml` - Check configuration (strictness, ignored rules)

pub mod check;

pub use check::{CONFIG_ENV, CONFIG_FILE_NAME, CheckConfig};
