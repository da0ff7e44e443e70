//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the weather service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// External services the pipeline depends on.
    pub upstreams: UpstreamsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamsConfig {
    pub location: LocationUpstreamConfig,
    pub weather: WeatherUpstreamConfig,
}

/// Postal-code lookup service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationUpstreamConfig {
    /// Base URL; requests go to `{base_url}/{cep}/json/`.
    pub base_url: String,
}

impl Default for LocationUpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://viacep.com.br/ws".to_string(),
        }
    }
}

/// Current-weather service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherUpstreamConfig {
    /// Endpoint queried with `?q={city},{country_code}&appid={api_key}`.
    pub base_url: String,

    /// API credential. Usually supplied through `WEATHER_API_KEY`.
    pub api_key: String,

    /// ISO 3166 country qualifier appended to the city name.
    pub country_code: String,
}

impl Default for WeatherUpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: String::new(),
            country_code: "br".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one outbound call, body included, in milliseconds.
    pub outbound_ms: u64,

    /// Connection establishment timeout for outbound calls in milliseconds.
    pub connect_ms: u64,

    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn outbound(&self) -> Duration {
        Duration::from_millis(self.outbound_ms)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            outbound_ms: 3_000,
            connect_ms: 2_000,
            request_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Service name reported on exported spans.
    pub service_name: String,

    /// Zipkin v2 collector URL (e.g. "http://zipkin:9411/api/v2/spans").
    /// Spans are not exported when unset.
    pub zipkin_endpoint: Option<String>,

    /// Spans queued for export before new ones are dropped.
    pub max_queue_size: usize,

    /// Maximum spans per export batch.
    pub batch_size: usize,

    /// Interval between export flushes in milliseconds.
    pub flush_interval_ms: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            service_name: "cep-weather".to_string(),
            zipkin_endpoint: None,
            max_queue_size: 2_048,
            batch_size: 64,
            flush_interval_ms: 1_000,
        }
    }
}
