//! Logging subscriber initialisation.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Errors that can occur while initialising logging.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// A logging subscriber was already installed.
    #[error("failed to initialise logging subscriber")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Initialise the tracing subscriber with a compact fmt layer.
///
/// `RUST_LOG` takes precedence over the configured default level.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().compact().with_target(true))
        .with(filter)
        .try_init()?;

    Ok(())
}
