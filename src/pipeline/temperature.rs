//! Kelvin conversions.
//!
//! Every output is rounded to one decimal place, half away from zero
//! (`f64::round` on the value scaled by ten). A negative zero result is
//! reported as `0.0`.

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(k: f64) -> f64 {
    round1(k - KELVIN_OFFSET)
}

pub fn kelvin_to_fahrenheit(k: f64) -> f64 {
    round1((k - KELVIN_OFFSET) * 1.8 + 32.0)
}

pub fn kelvin_to_kelvin(k: f64) -> f64 {
    round1(k)
}

/// Round to one decimal place, half away from zero.
pub fn round1(x: f64) -> f64 {
    // Adding +0.0 turns -0.0 into 0.0.
    (x * 10.0).round() / 10.0 + 0.0
}

/// A temperature in all three reported units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    pub celsius: f64,
    pub fahrenheit: f64,
    pub kelvin: f64,
}

impl Temperatures {
    pub fn from_kelvin(k: f64) -> Self {
        Self {
            celsius: kelvin_to_celsius(k),
            fahrenheit: kelvin_to_fahrenheit(k),
            kelvin: kelvin_to_kelvin(k),
        }
    }
}
