//! Logging setup for binaries embedding the library.
//!
//! Events go to stderr so that command output on stdout stays machine
//! readable. The level is taken from `RUST_LOG` when set, otherwise from the
//! caller's default.

use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to `default_directive`
/// (e.g. `"warn"` or `"its_quadkeys=debug"`).
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(default_directive: &str) -> Result<(), TryInitError> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter(default_directive))
        .with(stderr_layer)
        .try_init()
}
