//! CEP weather service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──GET /weather/{cep}──▶ http::server (request id, trace layer, timeout)
//!                                      │  extract traceparent, open "get_weather" span
//!                                      ▼
//!                                 pipeline::engine
//!                                      │  postal_code: 8 digits or 422
//!                                      │  upstream::location ──▶ postal lookup service
//!                                      │  upstream::weather  ──▶ weather service
//!                                      │  temperature: K → °C / °F / K
//!                                      ▼
//!   Client ◀── JSON ───────────── http::response (200 / 422 / 404 / 502)
//!
//!   Cross-cutting: config, observability (logging, spans → Zipkin),
//!   lifecycle
//! ```

use cep_weather::lifecycle::startup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    startup::run_from_env().await?;
    Ok(())
}
