//! CLI command implementations

pub mod completions;
pub mod run;
pub mod shell;
