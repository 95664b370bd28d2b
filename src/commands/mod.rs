//! Command implementations for the charmbundle CLI

pub mod completions;
pub mod helpers;
pub mod list;
pub mod render;
pub mod show;
pub mod validate;
pub mod version;
