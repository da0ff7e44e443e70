//! Current weather from an OpenWeather-compatible service.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::WeatherUpstreamConfig;
use crate::observability::TraceContext;
use crate::pipeline::WeatherSample;
use crate::upstream::client::TracedClient;
use crate::upstream::{WeatherError, WeatherLookup};

#[derive(Clone)]
pub struct OpenWeatherClient {
    http: TracedClient,
    base_url: String,
    api_key: String,
    country_code: String,
}

impl OpenWeatherClient {
    pub fn new(http: TracedClient, config: &WeatherUpstreamConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            country_code: config.country_code.clone(),
        }
    }

    /// `{base}?q={city},{country}&appid={key}` with city and key form-encoded.
    fn request_url(&self, city: &str) -> String {
        format!(
            "{}?q={},{}&appid={}",
            self.base_url,
            encode(city),
            encode(&self.country_code),
            encode(&self.api_key)
        )
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.base_url)
            .field("country_code", &self.country_code)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn fetch_weather(
        &self,
        city: &str,
        trace: &TraceContext,
    ) -> Result<WeatherSample, WeatherError> {
        let res = self.http.get(&self.request_url(city), trace).await?;

        if !res.status.is_success() {
            return Err(WeatherError::Status(res.status.as_u16()));
        }

        parse_weather(&res.body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    #[serde(default)]
    pressure: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
}

/// Interpret a current-weather response body. Temperatures are in Kelvin.
pub fn parse_weather(body: &str) -> Result<WeatherSample, WeatherError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;

    if !parsed.main.temp.is_finite() {
        return Err(WeatherError::Parse(format!(
            "temperature is not a finite number: {}",
            parsed.main.temp
        )));
    }

    Ok(WeatherSample {
        temp_kelvin: parsed.main.temp,
        temp_min_kelvin: parsed.main.temp_min,
        temp_max_kelvin: parsed.main.temp_max,
        pressure: parsed.main.pressure,
        humidity: parsed.main.humidity,
    })
}
