//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber
//! - Pick the log level from `RUST_LOG`, falling back to configuration
//! - Select pretty or JSON output
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - Initialization happens once, in `main`; tests never install a subscriber

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Error returned when a global subscriber is already installed.
pub type InitError = tracing_subscriber::util::TryInitError;

/// Install the global subscriber described by `config`.
pub fn init(config: &ObservabilityConfig) -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    }
}

/// Directive used when `RUST_LOG` is not set.
fn default_filter(level: &str) -> String {
    format!("cep_weather={level},tower_http={level}")
}
