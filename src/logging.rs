use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global tracing subscriber.
/// - Respects `RUST_LOG` if set, defaults to `info`
/// - Writes to stderr; stdout carries the CSV output
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}
