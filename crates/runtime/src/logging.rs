//! Tracing subscriber setup for binaries and tests.

use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` when set and valid, else `default_directive`,
/// else `info`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a stderr `fmt` subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
