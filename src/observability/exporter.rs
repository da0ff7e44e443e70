//! Span export.
//!
//! # Responsibilities
//! - Build the tracer provider the service's `Tracer` is opened on
//! - Ship finished spans to a Zipkin v2 collector when one is configured
//!
//! # Design Decisions
//! - Export runs on the SDK's batch processor, off the request path
//! - The export queue is bounded; when the collector stalls, new spans are
//!   dropped instead of piling up in memory
//! - Without a collector, spans are still created (ids are propagated and
//!   mirrored into the logs) but nothing is exported

use opentelemetry_sdk::trace::{BatchConfigBuilder, BatchSpanProcessor, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use opentelemetry_zipkin::ZipkinExporter;
use std::time::Duration;
use thiserror::Error;

use crate::config::ObservabilityConfig;

/// Failure building the span export pipeline.
#[derive(Debug, Error)]
pub enum ExportSetupError {
    #[error("invalid collector endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("failed to build Zipkin exporter: {0}")]
    Zipkin(String),

    #[error("span exporter setup task failed: {0}")]
    Setup(#[from] tokio::task::JoinError),
}

/// Batching settings for span export.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Spans held while waiting for export; more are dropped.
    pub max_queue_size: usize,
    pub max_batch_size: usize,
    pub flush_interval: Duration,
}

impl From<&ObservabilityConfig> for BatchSettings {
    fn from(config: &ObservabilityConfig) -> Self {
        Self {
            max_queue_size: config.max_queue_size,
            max_batch_size: config.batch_size,
            flush_interval: Duration::from_millis(config.flush_interval_ms),
        }
    }
}

/// Batch processor over `exporter`, bounded by `settings`.
pub fn batch_processor(exporter: ZipkinExporter, settings: &BatchSettings) -> BatchSpanProcessor {
    let config = BatchConfigBuilder::default()
        .with_max_queue_size(settings.max_queue_size)
        .with_max_export_batch_size(settings.max_batch_size.min(settings.max_queue_size))
        .with_scheduled_delay(settings.flush_interval)
        .build();

    BatchSpanProcessor::builder(exporter)
        .with_batch_config(config)
        .build()
}

/// Zipkin v2 exporter posting to `endpoint`.
pub fn zipkin_exporter(endpoint: &str) -> Result<ZipkinExporter, ExportSetupError> {
    url::Url::parse(endpoint).map_err(|source| ExportSetupError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;

    ZipkinExporter::builder()
        .with_collector_endpoint(endpoint)
        .build()
        .map_err(|e| ExportSetupError::Zipkin(e.to_string()))
}

/// Build the tracer provider selected by configuration.
///
/// The Zipkin exporter uses a blocking HTTP client, so this must not run on
/// an async worker thread; use [`build_tracer_provider`] from async code.
/// The caller owns the provider and must shut it down to flush queued spans.
pub fn tracer_provider(
    config: &ObservabilityConfig,
) -> Result<SdkTracerProvider, ExportSetupError> {
    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();
    let builder = SdkTracerProvider::builder().with_resource(resource);

    let provider = match config.zipkin_endpoint.as_deref() {
        Some(endpoint) => {
            let exporter = zipkin_exporter(endpoint)?;
            tracing::info!(
                endpoint = %endpoint,
                max_queue_size = config.max_queue_size,
                "Exporting spans to Zipkin"
            );
            builder
                .with_span_processor(batch_processor(exporter, &BatchSettings::from(config)))
                .build()
        }
        None => {
            tracing::info!("No span collector configured; spans are not exported");
            builder.build()
        }
    };

    Ok(provider)
}

/// [`tracer_provider`], run on the blocking pool.
pub async fn build_tracer_provider(
    config: &ObservabilityConfig,
) -> Result<SdkTracerProvider, ExportSetupError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || tracer_provider(&config)).await?
}

/// Flush and stop the provider's processors, waiting at most `timeout`.
pub async fn shutdown_provider(provider: SdkTracerProvider, timeout: Duration) {
    let flush = tokio::task::spawn_blocking(move || provider.shutdown());

    match tokio::time::timeout(timeout, flush).await {
        Ok(Ok(Ok(()))) => tracing::debug!("Span exporter stopped"),
        Ok(Ok(Err(e))) => tracing::warn!(error = %e, "Span exporter shutdown failed"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Span exporter shutdown panicked"),
        Err(_) => tracing::warn!(
            timeout_ms = timeout.as_millis() as u64,
            "Span exporter did not flush in time"
        ),
    }
}
