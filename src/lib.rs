//! Weather by Brazilian postal code (CEP).
//!
//! `GET /weather/{cep}` resolves the CEP to a city, fetches the current
//! temperature for it and answers in Celsius, Fahrenheit and Kelvin.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod upstream;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{WeatherReport, WeatherService};
