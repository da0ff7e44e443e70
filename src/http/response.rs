//! Response composition.
//!
//! # Responsibilities
//! - Serialize successful reports as JSON
//! - Map pipeline failures to status codes and problem bodies
//! - Log each failure at a level that matches its cause
//!
//! # Design Decisions
//! - Every location failure answers 404, but is logged distinctly
//! - Weather failures answer 502 with a body; the client always gets a response
//! - All bodies are `application/json`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineError, WeatherReport};
use crate::upstream::LocationError;

pub const INVALID_ZIPCODE: &str = "invalid zipcode";
pub const ZIPCODE_NOT_FOUND: &str = "can not find zipcode";
pub const WEATHER_LOOKUP_FAILED: &str = "weather lookup failed";

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetail {
    pub message: String,
}

impl PipelineError {
    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::InvalidPostalCode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Location(_) => StatusCode::NOT_FOUND,
            PipelineError::Weather(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message shown to clients. Upstream details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            PipelineError::InvalidPostalCode(_) => INVALID_ZIPCODE,
            PipelineError::Location(_) => ZIPCODE_NOT_FOUND,
            PipelineError::Weather(_) => WEATHER_LOOKUP_FAILED,
        }
    }

    /// Log the failure. Validation errors are client mistakes, not incidents.
    pub fn log(&self, request_id: &str, cep: &str) {
        match self {
            PipelineError::InvalidPostalCode(_) => {
                tracing::debug!(
                    request_id = %request_id,
                    cep = %cep,
                    "Rejected invalid postal code"
                );
            }
            PipelineError::Location(LocationError::NotFound) => {
                tracing::info!(request_id = %request_id, cep = %cep, "Postal code not found");
            }
            PipelineError::Location(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    cep = %cep,
                    error = %e,
                    "Location lookup failed"
                );
            }
            PipelineError::Weather(e) => {
                tracing::error!(
                    request_id = %request_id,
                    cep = %cep,
                    error = %e,
                    "Weather lookup failed"
                );
            }
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let body = ProblemDetail {
            message: self.public_message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Turn a pipeline outcome into the HTTP response.
pub fn compose(result: Result<WeatherReport, PipelineError>) -> Response {
    match result {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => e.into_response(),
    }
}
