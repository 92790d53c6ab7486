//! Logging setup for contacts-server.
//!
//! `tracing-subscriber` with an env filter and either human-readable or JSON
//! output. Precedence for the filter: `RUST_LOG`, then `-v` flags, then
//! `logging.level` from config.

use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::config::{LogFormat, LoggingConfig};

/// Filter directive for the given CLI verbosity, if any was requested.
#[must_use]
pub fn verbosity_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn build_filter(cfg: &LoggingConfig, verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directive = verbosity_directive(verbose).unwrap_or(cfg.level.as_str());
    EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("invalid logging.level '{directive}' ({e}); falling back to 'info'");
        EnvFilter::new("info")
    })
}

/// Install the global subscriber.
///
/// Called once at startup; a second call is a no-op.
pub fn init_logging(cfg: &LoggingConfig, verbose: u8) {
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match cfg.format {
        LogFormat::Text => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
    };

    let subscriber = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_filter(cfg, verbose));

    // Ignore the error if a subscriber is already set.
    let _ = subscriber.try_init();
}
