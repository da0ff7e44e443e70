//! Upstream call failures.

use thiserror::Error;

/// Failure resolving a postal code to a city.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The provider reports the postal code as unknown.
    #[error("postal code not found")]
    NotFound,

    /// The provider answered with a body we could not interpret.
    #[error("unparseable location response: {0}")]
    Parse(String),

    /// Connection failure, timeout or non-success status.
    #[error("location service unavailable: {0}")]
    Unavailable(String),
}

/// Failure fetching current weather for a city.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request timed out")]
    Timeout,

    #[error("weather request failed: {0}")]
    Transport(String),

    #[error("weather service returned status {0}")]
    Status(u16),

    #[error("unparseable weather response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LocationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LocationError::Unavailable("request timed out".to_string())
        } else {
            LocationError::Unavailable(e.to_string())
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WeatherError::Timeout
        } else {
            // Display for reqwest errors may include the URL, and with it the API key.
            WeatherError::Transport(e.without_url().to_string())
        }
    }
}
