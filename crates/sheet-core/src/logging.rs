#![forbid(unsafe_code)]

//! JSON structured-logging bootstrap (`tracing-json` feature).
//!
//! The filter is read from `RUST_LOG`; when unset, [`DEFAULT_FILTER`] is used.

use core::fmt;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str =
    "warn,sheet_core=info,sheet_runtime=info,sheet_widgets=info,sheet_nav=info";

/// Logging could not be installed.
#[derive(Debug)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    AlreadyInstalled(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInstalled(msg) => write!(f, "global subscriber already set: {msg}"),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install a JSON formatter as the global `tracing` subscriber.
pub fn init_json_logging() -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .map_err(|err| LoggingError::AlreadyInstalled(err.to_string()))?;
    tracing::info!("json logging installed");
    Ok(())
}
