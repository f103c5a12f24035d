//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{completions::CompletionsArgs, run::RunArgs};

#[derive(Parser)]
#[command(name = "whs")]
#[command(author, version, about = "Warehouse inventory toolkit")]
#[command(long_about = "Warehouse inventory toolkit\n\n\
Register a warehouse, then stock details, build them into assemblies and mechanisms, \
and sell what you no longer need.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Extra configuration file (overrides the global config)
    #[arg(long, global = true, env = "WHS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive session (default)
    Shell,

    /// Execute a session script, one command per line
    Run(RunArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable (tables and descriptions)
    #[default]
    Auto,
    /// Boxed table
    Table,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_long_help_starts_with_summary() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.starts_with("Warehouse inventory toolkit"));
        assert!(help.contains("sell what you no longer need"));
    }

    #[test]
    fn test_no_command_means_shell() {
        let cli = Cli::try_parse_from(["whs", "-q"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.global.quiet);
        assert_eq!(cli.global.format, OutputFormat::Auto);
    }
}
