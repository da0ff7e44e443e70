//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check upstream URLs, credentials and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("listener.bind_address: '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("upstreams.weather.api_key must not be empty")]
    MissingApiKey,

    #[error("upstreams.weather.country_code: '{0}' is not a two-letter code")]
    InvalidCountryCode(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("timeouts.request_secs ({request_ms} ms) must exceed 2 x {outbound_ms} ms")]
    RequestTimeoutTooShort { request_ms: u64, outbound_ms: u64 },
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    check_http_url(
        &mut errors,
        "upstreams.location.base_url",
        &config.upstreams.location.base_url,
    );
    check_http_url(
        &mut errors,
        "upstreams.weather.base_url",
        &config.upstreams.weather.base_url,
    );
    if let Some(endpoint) = &config.observability.zipkin_endpoint {
        check_http_url(&mut errors, "observability.zipkin_endpoint", endpoint);
    }

    let weather = &config.upstreams.weather;
    if weather.api_key.trim().is_empty() {
        errors.push(ValidationError::MissingApiKey);
    }
    if weather.country_code.len() != 2
        || !weather.country_code.bytes().all(|b| b.is_ascii_alphabetic())
    {
        errors.push(ValidationError::InvalidCountryCode(
            weather.country_code.clone(),
        ));
    }

    if config.timeouts.outbound_ms == 0 {
        errors.push(ValidationError::Zero("timeouts.outbound_ms"));
    }
    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_ms"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    // Both stages must be able to time out before the inbound deadline, or the
    // client sees the server's bare timeout instead of a 502.
    let request_ms = config.timeouts.request_secs.saturating_mul(1000);
    let stages_ms = config.timeouts.outbound_ms.saturating_mul(2);
    if config.timeouts.request_secs > 0 && request_ms <= stages_ms {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_ms,
            outbound_ms: config.timeouts.outbound_ms,
        });
    }
    if config.observability.max_queue_size == 0 {
        errors.push(ValidationError::Zero("observability.max_queue_size"));
    }
    if config.observability.batch_size == 0 {
        errors.push(ValidationError::Zero("observability.batch_size"));
    }
    if config.observability.flush_interval_ms == 0 {
        errors.push(ValidationError::Zero("observability.flush_interval_ms"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
