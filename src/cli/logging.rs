//! Diagnostic logging on stderr via `tracing`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Map `-v` occurrences to a maximum log level
pub fn level_for(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Install the global subscriber; `RUST_LOG` directives are honoured too
pub fn setup_logging(verbosity: u8) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(level_for(verbosity).into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
