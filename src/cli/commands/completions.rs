//! Shell completion generation
//!
//! ```bash
//! # Bash - add to ~/.bashrc
//! source <(whs completions bash)
//!
//! # Fish
//! whs completions fish > ~/.config/fish/completions/whs.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io::{self, Write};

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

/// Write the completion script for `shell` to `out`
pub fn write_completions(shell: Shell, out: &mut impl Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "whs", out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_name_binary() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("_whs"));
        assert!(script.contains("completions"));
    }
}
