//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and the tracer provider
//! - Bind the listener and serve until shutdown
//! - Flush exported spans before returning
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{self, ConfigError, ServiceConfig};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{exporter, logging, ExportSetupError, Tracer};

/// Upper bound on the final span flush.
const EXPORT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging already initialized: {0}")]
    Logging(#[from] logging::InitError),

    #[error("span exporter setup failed: {0}")]
    Exporter(#[from] ExportSetupError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load configuration from the environment and run until signalled.
pub async fn run_from_env() -> Result<(), StartupError> {
    let config = config::load_from_env()?;
    logging::init(&config.observability)?;
    run(config).await
}

/// Run the service with an already-validated configuration.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        location_upstream = %config.upstreams.location.base_url,
        weather_upstream = %config.upstreams.weather.base_url,
        outbound_timeout_ms = config.timeouts.outbound_ms,
        "Configuration loaded"
    );

    let provider = exporter::build_tracer_provider(&config.observability).await?;
    let tracer = Tracer::new(&provider);

    let server = HttpServer::new(config.clone(), tracer)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal_task = signals::spawn_signal_listener(&shutdown);

    let served = server.run(listener, shutdown.subscribe()).await;
    signal_task.abort();

    exporter::shutdown_provider(provider, EXPORT_FLUSH_TIMEOUT).await;

    served?;
    tracing::info!("Shutdown complete");
    Ok(())
}
