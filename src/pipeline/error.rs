//! Pipeline failures.

use thiserror::Error;

use crate::pipeline::postal_code::InvalidPostalCode;
use crate::upstream::{LocationError, WeatherError};

/// Why a weather lookup did not produce a report.
///
/// Each variant identifies the stage that failed; mapping to HTTP happens in
/// `http::response`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidPostalCode(#[from] InvalidPostalCode),

    #[error("location lookup failed: {0}")]
    Location(#[from] LocationError),

    #[error("weather lookup failed: {0}")]
    Weather(#[from] WeatherError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
