//! CLI module - argument parsing, sessions and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;
pub mod logging;
pub mod output;
pub mod session;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
