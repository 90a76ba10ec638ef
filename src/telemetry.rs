//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, ValidationError};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.level` when set. Calling this again after a
/// subscriber is installed (tests, embedding applications) is a no-op.
///
/// # Errors
///
/// Returns `InvalidLogLevel` if neither `RUST_LOG` nor `config.level`
/// parses as a filter directive.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ValidationError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|_| ValidationError::InvalidLogLevel(config.level.clone()))?;

    let json_layer = config
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_current_span(true));
    let text_layer = (!config.json).then(tracing_subscriber::fmt::layer);

    if tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }

    Ok(())
}
