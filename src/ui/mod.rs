//! Terminal presentation for command output
//!
//! Everything here writes human-readable text to stdout using `console`
//! styles. Machine-readable output is produced by the commands directly.

pub mod display;
