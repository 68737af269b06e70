//! Diagnostic tracing setup
//!
//! Diagnostics go to stderr and are separate from the audit log in
//! [`crate::audit`]. `RUST_LOG` overrides the default level.

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the stderr tracing subscriber
///
/// A failed global init (another subscriber is already installed, as in test
/// harnesses) is reported on stderr and otherwise ignored.
pub fn init_tracing(level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::builder().parse_lossy(level.to_string()));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    if let Err(error) = subscriber.try_init() {
        eprintln!("Failed to initialize tracing subscriber: {error}");
        return;
    }

    tracing::debug!("Tracing initialized with level: {:?}", level);
}
