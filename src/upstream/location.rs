//! Postal-code lookup against a ViaCEP-compatible service.
//!
//! `GET {base}/{cep}/json/` answers either with an address object or with
//! `{"erro": true}` (newer deployments send `"erro": "true"`).

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::LocationUpstreamConfig;
use crate::observability::TraceContext;
use crate::pipeline::{Location, PostalCode};
use crate::upstream::client::TracedClient;
use crate::upstream::{LocationError, LocationLookup};

#[derive(Debug, Clone)]
pub struct ViaCepClient {
    http: TracedClient,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(http: TracedClient, config: &LocationUpstreamConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn lookup_url(&self, cep: &PostalCode) -> String {
        format!("{}/{}/json/", self.base_url, cep)
    }
}

#[async_trait]
impl LocationLookup for ViaCepClient {
    async fn resolve(
        &self,
        cep: &PostalCode,
        trace: &TraceContext,
    ) -> Result<Location, LocationError> {
        let res = self.http.get(&self.lookup_url(cep), trace).await?;

        if !res.status.is_success() {
            return Err(LocationError::Unavailable(format!(
                "status {}: {}",
                res.status,
                truncate_body(&res.body)
            )));
        }

        parse_location(&res.body)
    }
}

/// `erro` is a boolean in the documented API and a string in some deployments.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorFlag {
    Bool(bool),
    Text(String),
}

impl ErrorFlag {
    fn is_set(&self) -> bool {
        match self {
            ErrorFlag::Bool(b) => *b,
            ErrorFlag::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    erro: Option<ErrorFlag>,
}

#[derive(Debug, Deserialize)]
struct Address {
    localidade: String,
}

/// Interpret a lookup response body.
///
/// The error-flag shape is checked first; only then is the body read as an
/// address.
pub fn parse_location(body: &str) -> Result<Location, LocationError> {
    if let Ok(ErrorResponse { erro: Some(flag) }) = serde_json::from_str::<ErrorResponse>(body) {
        if flag.is_set() {
            return Err(LocationError::NotFound);
        }
    }

    let address: Address =
        serde_json::from_str(body).map_err(|e| LocationError::Parse(e.to_string()))?;

    let city = address.localidade.trim();
    if city.is_empty() {
        return Err(LocationError::NotFound);
    }

    Ok(Location {
        city: city.to_string(),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
