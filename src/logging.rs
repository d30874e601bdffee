//! Diagnostic tracing for the hexpath binary.
//!
//! The library only emits `tracing` events; this module installs the
//! subscriber that prints them. Output goes to stderr so that it never mixes
//! with the path printed on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` if set. Otherwise defaults to `warn`, or `hexpath=debug`
/// when `verbose` is true.
///
/// # Example
/// ```bash
/// RUST_LOG=hexpath=debug hexpath find park.map
/// ```
pub fn init(verbose: bool) {
    let fallback = if verbose { "hexpath=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
