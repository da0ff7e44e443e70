//! Weather-by-postal-code pipeline.
//!
//! # Data Flow
//! ```text
//! raw path segment
//!     → postal_code.rs (8 ASCII digits, else InvalidPostalCode)
//!     → engine.rs: LocationLookup (span "resolve_location")
//!     → engine.rs: WeatherLookup  (span "fetch_weather", city lower-cased)
//!     → temperature.rs (Kelvin → °C / °F / K, one decimal)
//!     → WeatherReport
//! ```
//!
//! # Design Decisions
//! - Stages run strictly in sequence and short-circuit on the first error
//! - Trace context is passed explicitly; nothing reads request headers here
//! - Errors carry their stage; only the HTTP layer turns them into statuses

pub mod engine;
pub mod error;
pub mod postal_code;
pub mod temperature;
pub mod types;

pub use engine::WeatherService;
pub use error::{PipelineError, PipelineResult};
pub use postal_code::{validate, InvalidPostalCode, PostalCode};
pub use temperature::{kelvin_to_celsius, kelvin_to_fahrenheit, kelvin_to_kelvin, Temperatures};
pub use types::{Location, WeatherReport, WeatherSample};
