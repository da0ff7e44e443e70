//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request headers
//!     → tracing.rs (extract traceparent once, open server span)
//!     → per-stage client spans, traceparent injected into upstream calls
//!     → exporter.rs (tracer provider, bounded batch export to Zipkin)
//!
//! All subsystems:
//!     → logging.rs (structured log events via `tracing`)
//! ```
//!
//! # Design Decisions
//! - Structured logging (pretty or JSON) for machine parsing
//! - Request ID and trace ID flow through every log line of a request
//! - Span export is fire-and-forget; it never fails a request

pub mod exporter;
pub mod logging;
pub mod tracing;

#[cfg(test)]
pub(crate) mod testing;

pub use self::exporter::{build_tracer_provider, shutdown_provider, ExportSetupError};
pub use self::tracing::{SpanGuard, SpanKind, TraceContext, Tracer};
