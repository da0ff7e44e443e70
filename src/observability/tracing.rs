//! Distributed tracing support.
//!
//! # Responsibilities
//! - Extract W3C trace context from incoming requests, once, at the handler boundary
//! - Open spans for the request handler and for each outbound call
//! - Inject the active span's `traceparent` into outbound requests
//!
//! # Design Decisions
//! - Built on the OpenTelemetry SDK; the `TraceContextPropagator` does all
//!   header parsing and formatting
//! - The tracer is a cloneable handle injected through app state, never the
//!   global provider
//! - `SpanGuard` ends its span on `end()` or on drop, whichever comes first;
//!   the SDK exports an ended span exactly once
//! - Unsampled parents (`flags = 00`) yield unsampled children: ids are
//!   propagated, nothing is exported

use axum::http::HeaderMap;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::{
    SpanContext, SpanId, Status, TraceContextExt, TraceId, Tracer as _, TracerProvider as _,
};
use opentelemetry::{Context, KeyValue};
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use std::fmt;

pub use opentelemetry::trace::SpanKind;

/// W3C Trace Context header name.
pub const TRACEPARENT: &str = "traceparent";

/// W3C vendor-specific trace state header name.
pub const TRACESTATE: &str = "tracestate";

/// Instrumentation scope reported on every span.
const SCOPE: &str = "cep-weather";

/// Position in a trace, as seen from this service: the caller's remote span,
/// one of our own spans, or nothing (a fresh root).
#[derive(Clone, Default)]
pub struct TraceContext {
    cx: Context,
}

impl TraceContext {
    /// Context with no parent; the first span opened under it starts a new trace.
    pub fn new_root() -> Self {
        Self::default()
    }

    /// Extract the caller's context from request headers.
    ///
    /// A missing or malformed `traceparent` yields a new root instead of failing
    /// the request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cx = TraceContextPropagator::new().extract(&HeaderExtractor(headers));
        if headers.contains_key(TRACEPARENT) && !cx.span().span_context().is_valid() {
            tracing::debug!(
                traceparent = ?headers.get(TRACEPARENT),
                "Ignoring malformed traceparent header"
            );
        }
        Self { cx }
    }

    fn span_context(&self) -> SpanContext {
        self.cx.span().span_context().clone()
    }

    /// Trace id, or `TraceId::INVALID` for a fresh root.
    pub fn trace_id(&self) -> TraceId {
        self.span_context().trace_id()
    }

    /// Id of the span this context names, if any.
    pub fn span_id(&self) -> Option<SpanId> {
        let span_context = self.span_context();
        span_context.is_valid().then(|| span_context.span_id())
    }

    pub fn is_sampled(&self) -> bool {
        let span_context = self.span_context();
        !span_context.is_valid() || span_context.is_sampled()
    }

    pub fn trace_state(&self) -> Option<String> {
        let state = self.span_context().trace_state().header();
        (!state.is_empty()).then_some(state)
    }

    /// Render the `traceparent` value naming this context's span.
    pub fn traceparent(&self) -> Option<String> {
        let mut headers = HeaderMap::new();
        self.inject(&mut headers);
        headers
            .get(TRACEPARENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Write `traceparent` (and `tracestate`, if any) into outbound headers.
    pub fn inject(&self, headers: &mut HeaderMap) {
        TraceContextPropagator::new().inject_context(&self.cx, &mut HeaderInjector(headers));
    }

    /// The underlying OpenTelemetry context.
    pub fn otel_context(&self) -> &Context {
        &self.cx
    }
}

impl fmt::Debug for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceContext")
            .field("trace_id", &self.trace_id())
            .field("span_id", &self.span_id())
            .field("sampled", &self.is_sampled())
            .finish()
    }
}

/// Cloneable handle that opens spans on an injected tracer provider.
#[derive(Clone)]
pub struct Tracer {
    inner: SdkTracer,
}

impl Tracer {
    pub fn new(provider: &SdkTracerProvider) -> Self {
        Self {
            inner: provider.tracer(SCOPE),
        }
    }

    /// Tracer whose spans go nowhere. Context is still propagated.
    pub fn noop() -> Self {
        Self::new(&SdkTracerProvider::builder().build())
    }

    /// Open a span as a child of `parent`.
    pub fn start_span(
        &self,
        parent: &TraceContext,
        name: &'static str,
        kind: SpanKind,
    ) -> SpanGuard {
        let span = self
            .inner
            .span_builder(name)
            .with_kind(kind.clone())
            .start_with_context(&self.inner, &parent.cx);
        let context = TraceContext {
            cx: parent.cx.with_span(span),
        };

        let span = tracing::info_span!(
            "span",
            otel.name = name,
            otel.kind = ?kind,
            trace_id = %context.trace_id(),
            span_id = %context.span_context().span_id(),
        );

        SpanGuard { context, span }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer").field("scope", &SCOPE).finish()
    }
}

/// An open span. Ended by `end()` or when dropped.
pub struct SpanGuard {
    context: TraceContext,
    span: tracing::Span,
}

impl SpanGuard {
    /// Context naming this span, for children and outbound injection.
    pub fn context(&self) -> &TraceContext {
        &self.context
    }

    pub fn traceparent(&self) -> Option<String> {
        self.context.traceparent()
    }

    /// The `tracing` span mirroring this one, for instrumenting futures.
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    pub fn set_tag(&mut self, key: &'static str, value: impl Into<String>) {
        self.context
            .cx
            .span()
            .set_attribute(KeyValue::new(key, value.into()));
    }

    /// Mark the span failed.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.context
            .cx
            .span()
            .set_status(Status::error(message.into()));
    }

    /// End the span now. Same as dropping the guard.
    pub fn end(self) {}
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        self.context.cx.span().end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::testing::{attribute, finished, recording_tracer};

    const SAMPLE: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn headers_with(traceparent: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TRACEPARENT, traceparent.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_valid_traceparent() {
        let ctx = TraceContext::from_headers(&headers_with(SAMPLE));
        assert_eq!(ctx.trace_id().to_string(), "4bf92f3577b34da6a3ce929d0e0e4736");
        assert_eq!(ctx.span_id().unwrap().to_string(), "00f067aa0ba902b7");
        assert!(ctx.is_sampled());
        assert_eq!(ctx.traceparent().unwrap(), SAMPLE);
    }

    #[test]
    fn test_missing_header_is_root() {
        let ctx = TraceContext::from_headers(&HeaderMap::new());
        assert!(ctx.span_id().is_none());
        assert!(ctx.is_sampled());
        assert!(ctx.traceparent().is_none());
    }

    #[test]
    fn test_malformed_headers_are_root() {
        for raw in [
            "invalid-trace-context",
            "00-00000000000000000000000000000000-00f067aa0ba902b7-01",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-0000000000000000-01",
            "ff-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
            "00-4BF92F3577B34DA6A3CE929D0E0E4736-00f067aa0ba902b7-01",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01-extra",
        ] {
            let ctx = TraceContext::from_headers(&headers_with(raw));
            assert!(ctx.span_id().is_none(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_future_version_with_extra_fields_is_accepted() {
        let ctx = TraceContext::from_headers(&headers_with(
            "01-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01-future",
        ));
        assert_eq!(ctx.span_id().unwrap().to_string(), "00f067aa0ba902b7");
    }

    #[test]
    fn test_unsampled_flag() {
        let ctx = TraceContext::from_headers(&headers_with(
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-00",
        ));
        assert!(!ctx.is_sampled());
        assert!(ctx.traceparent().unwrap().ends_with("-00"));
    }

    #[test]
    fn test_inject_carries_tracestate() {
        let mut inbound = headers_with(SAMPLE);
        inbound.insert(TRACESTATE, "congo=t61rcWkgMzE".parse().unwrap());
        let ctx = TraceContext::from_headers(&inbound);
        assert_eq!(ctx.trace_state().as_deref(), Some("congo=t61rcWkgMzE"));

        let mut outbound = HeaderMap::new();
        ctx.inject(&mut outbound);
        assert_eq!(outbound.get(TRACEPARENT).unwrap(), SAMPLE);
        assert_eq!(outbound.get(TRACESTATE).unwrap(), "congo=t61rcWkgMzE");
    }

    #[test]
    fn test_child_span_keeps_trace_and_links_parent() {
        let (tracer, exporter) = recording_tracer();
        let parent = TraceContext::from_headers(&headers_with(SAMPLE));

        let span = tracer.start_span(&parent, "child", SpanKind::Client);
        assert_eq!(span.context().trace_id(), parent.trace_id());
        assert_ne!(span.context().span_id(), parent.span_id());
        let header = span.traceparent().unwrap();
        assert!(header.starts_with("00-4bf92f3577b34da6a3ce929d0e0e4736-"));
        span.end();

        let spans = finished(&exporter);
        assert_eq!(spans.len(), 1);
        assert_eq!(Some(spans[0].parent_span_id), parent.span_id());
        assert_eq!(spans[0].span_kind, SpanKind::Client);
    }

    #[test]
    fn test_root_span_starts_new_trace() {
        let (tracer, exporter) = recording_tracer();

        let span = tracer.start_span(&TraceContext::new_root(), "op", SpanKind::Internal);
        assert_ne!(span.context().trace_id(), TraceId::INVALID);
        span.end();

        let spans = finished(&exporter);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].parent_span_id, SpanId::INVALID);
    }

    #[test]
    fn test_span_exported_once_on_drop() {
        let (tracer, exporter) = recording_tracer();

        {
            let mut span = tracer.start_span(&TraceContext::new_root(), "op", SpanKind::Internal);
            span.set_tag("cep", "01310100");
            span.record_error("boom");
        }

        let spans = finished(&exporter);
        assert_eq!(spans.len(), 1);
        assert!(matches!(&spans[0].status, Status::Error { description } if description == "boom"));
        assert_eq!(attribute(&spans[0], "cep").as_deref(), Some("01310100"));
    }

    #[test]
    fn test_unsampled_spans_are_propagated_not_exported() {
        let (tracer, exporter) = recording_tracer();
        let parent = TraceContext::from_headers(&headers_with(
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-00",
        ));

        let span = tracer.start_span(&parent, "op", SpanKind::Server);
        let header = span.traceparent().unwrap();
        assert!(header.starts_with("00-4bf92f3577b34da6a3ce929d0e0e4736-"));
        assert!(header.ends_with("-00"));
        span.end();

        assert!(finished(&exporter).is_empty());
    }

    #[test]
    fn test_noop_tracer_still_propagates() {
        let span = Tracer::noop().start_span(&TraceContext::new_root(), "op", SpanKind::Server);
        assert!(span.traceparent().is_some());
    }
}
