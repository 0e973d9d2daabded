//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured filter when it is set. Installing a
//! subscriber twice is not an error: the second call reports `false` and
//! leaves the first one in place, so tests and embedding shells can both
//! call [`init_tracing`].

use sitedesk_domain::{LoggingConfig, SiteDeskError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to `config.filter`.
///
/// # Errors
/// Returns `SiteDeskError::Config` when the configured directive is invalid.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, SiteDeskError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            SiteDeskError::Config(format!("Invalid log filter '{}': {e}", config.filter))
        }),
    }
}

/// Install the global fmt subscriber.
///
/// Returns `true` when this call installed it.
///
/// # Errors
/// Returns `SiteDeskError::Config` when the configured directive is invalid.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, SiteDeskError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init().is_ok()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init().is_ok()
    };

    if installed {
        tracing::debug!(filter = %config.filter, json = config.json, "tracing initialised");
    }
    Ok(installed)
}
