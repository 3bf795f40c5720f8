//! Logging setup utilities for the idobata chat relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Sets up logging for the given targets (crate names and binary name).
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `targets` - Log targets to enable (e.g., `["idobata_server", "server"]`)
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use idobata_shared::logger::setup_logger;
///
/// setup_logger(&["idobata_server", "server"], "debug");
/// ```
pub fn setup_logger(targets: &[&str], default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                targets
                    .iter()
                    .map(|target| format!("{}={}", target.replace("-", "_"), default_level))
                    .collect::<Vec<_>>()
                    .join(",")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
