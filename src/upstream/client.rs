//! Outbound HTTP client shared by the upstream adapters.
//!
//! Wraps `reqwest::Client` so every call carries the caller's trace context
//! and is bounded by the configured timeouts.

use reqwest::StatusCode;
use std::fmt;

use crate::config::TimeoutConfig;
use crate::observability::TraceContext;

/// A traced HTTP client that injects W3C trace context into outgoing requests.
#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

/// Status and fully-read body of an upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Build a client whose calls time out per `timeouts`.
    pub fn from_config(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(timeouts.outbound())
            .connect_timeout(timeouts.connect())
            .user_agent(concat!("cep-weather/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(inner))
    }

    /// GET `url` with `trace` injected and read the whole body.
    pub async fn get(
        &self,
        url: &str,
        trace: &TraceContext,
    ) -> reqwest::Result<UpstreamResponse> {
        let mut request = self.inner.get(url).build()?;
        trace.inject(request.headers_mut());

        let response = self.inner.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(UpstreamResponse { status, body })
    }
}

impl fmt::Debug for TracedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedClient").finish_non_exhaustive()
    }
}
