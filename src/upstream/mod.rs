//! External services the pipeline depends on.
//!
//! # Data Flow
//! ```text
//! pipeline::engine
//!     → LocationLookup (location.rs: postal code → city)
//!     → WeatherLookup  (weather.rs: city → Kelvin sample)
//!     both over client.rs (timeouts + traceparent injection)
//! ```
//!
//! # Design Decisions
//! - The pipeline only sees the two traits; HTTP adapters and test fakes
//!   implement them
//! - Adapters read the whole body, then classify; no stage retries

use async_trait::async_trait;

use crate::observability::TraceContext;
use crate::pipeline::{Location, PostalCode, WeatherSample};

pub mod client;
pub mod error;
pub mod location;
pub mod weather;

pub use client::TracedClient;
pub use error::{LocationError, WeatherError};
pub use location::ViaCepClient;
pub use weather::OpenWeatherClient;

/// Resolves a postal code to the city it belongs to.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn resolve(&self, cep: &PostalCode, trace: &TraceContext)
        -> Result<Location, LocationError>;
}

/// Fetches the current weather for a (lower-cased) city name.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn fetch_weather(
        &self,
        city: &str,
        trace: &TraceContext,
    ) -> Result<WeatherSample, WeatherError>;
}
