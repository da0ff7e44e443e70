//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the weather handler
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Build the upstream adapters from configuration
//! - Bind server to listener and shut down gracefully

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::Instrument;

use crate::config::ServiceConfig;
use crate::http::{request, response};
use crate::observability::{SpanKind, TraceContext, Tracer};
use crate::pipeline::WeatherService;
use crate::upstream::{OpenWeatherClient, TracedClient, ViaCepClient};

/// Errors building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

/// HTTP server for the weather service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server talking to the upstreams named in `config`.
    pub fn new(config: ServiceConfig, tracer: Tracer) -> Result<Self, ServerError> {
        let client = TracedClient::from_config(&config.timeouts)?;
        let locations = Arc::new(ViaCepClient::new(client.clone(), &config.upstreams.location));
        let weather = Arc::new(OpenWeatherClient::new(client, &config.upstreams.weather));

        let service = WeatherService::new(locations, weather, tracer);
        Ok(Self::with_service(config, service))
    }

    /// Create a server around an already-assembled pipeline.
    pub fn with_service(config: ServiceConfig, service: WeatherService) -> Self {
        let state = AppState {
            service: Arc::new(service),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/weather/{cep}", get(weather_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(config.timeouts.request()))
            .layer(request::propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(request::set_request_id_layer())
    }

    /// The router, for in-process use (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            outbound_timeout_ms = self.config.timeouts.outbound_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// `GET /weather/{cep}`.
///
/// Extracts the caller's trace context once and opens the request span; the
/// span closes when this function returns, on every path. If the client goes
/// away, axum drops this future, which aborts any in-flight upstream call
/// and still closes the spans.
///
/// A path segment that does not decode to UTF-8 is treated as an invalid
/// postal code, so it gets the same 422 body as any other bad input.
async fn weather_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Response {
    let request_id = request::request_id(&headers).to_string();
    let parent = TraceContext::from_headers(&headers);

    let cep = match path {
        Ok(Path(cep)) => cep,
        Err(rejection) => {
            tracing::debug!(
                request_id = %request_id,
                error = %rejection,
                "Undecodable postal code segment"
            );
            String::new()
        }
    };

    let mut span = state
        .service
        .tracer()
        .start_span(&parent, "get_weather", SpanKind::Server);
    span.set_tag("http.method", "GET");
    span.set_tag("http.route", "/weather/{cep}");
    span.set_tag("request_id", request_id.as_str());

    tracing::debug!(
        request_id = %request_id,
        trace_id = %span.context().trace_id(),
        cep = %cep,
        "Weather lookup requested"
    );

    let result = state
        .service
        .lookup(&cep, span.context())
        .instrument(span.span().clone())
        .await;

    if let Err(e) = &result {
        e.log(&request_id, &cep);
        span.record_error(e.to_string());
    }

    let response = response::compose(result);
    span.set_tag("http.status_code", response.status().as_u16().to_string());
    response
}
