//! Pipeline data types.

use serde::{Deserialize, Serialize};

use crate::pipeline::temperature::Temperatures;

/// City resolved from a postal code. `city` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
}

/// Current reading from the weather provider, in Kelvin.
///
/// Only `temp_kelvin` feeds the response; the rest is kept when the provider
/// sends it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherSample {
    pub temp_kelvin: f64,
    pub temp_min_kelvin: Option<f64>,
    pub temp_max_kelvin: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl WeatherReport {
    pub fn new(city: impl Into<String>, temps: Temperatures) -> Self {
        Self {
            city: city.into(),
            temp_c: temps.celsius,
            temp_f: temps.fahrenheit,
            temp_k: temps.kelvin,
        }
    }
}
