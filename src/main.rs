use clap::Parser;
use miette::Result;
use whs::cli::commands::{completions, run, shell};
use whs::cli::logging::setup_logging;
use whs::cli::{Cli, Commands};
use whs::core::Config;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    if global.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    setup_logging(global.verbose);

    let config = Config::load(global.config.as_deref());

    match cli.command {
        None | Some(Commands::Shell) => shell::run(&global, config),
        Some(Commands::Run(args)) => run::run(args, &global, config),
        Some(Commands::Completions(args)) => completions::run(args),
    }
}
