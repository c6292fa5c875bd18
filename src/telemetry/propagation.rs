//! W3C trace-context and baggage propagation over HTTP headers.
//!
//! The propagator is an explicit value handed to whoever crosses a service
//! boundary; the OpenTelemetry global propagator is never installed.

use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::{
    propagation::{Extractor, Injector, TextMapCompositePropagator, TextMapPropagator},
    Context,
};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT: &str = "traceparent";

#[derive(Clone)]
pub struct TracePropagator {
    inner: Arc<TextMapCompositePropagator>,
}

impl TracePropagator {
    /// Trace context followed by baggage, the same pair on every hop.
    pub fn w3c() -> Self {
        let propagators = TextMapCompositePropagator::new(vec![
            Box::new(TraceContextPropagator::new()),
            Box::new(BaggagePropagator::new()),
        ]);

        Self {
            inner: Arc::new(propagators),
        }
    }

    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.inner.extract(&HeaderExtractor(headers))
    }

    pub fn inject(&self, context: &Context, headers: &mut HeaderMap) {
        self.inner
            .inject_context(context, &mut HeaderInjector(headers));
    }

    /// Injects the context of the current `tracing` span.
    pub fn inject_current(&self, headers: &mut HeaderMap) {
        let context = Span::current().context();
        self.inject(&context, headers);
    }
}

impl Default for TracePropagator {
    fn default() -> Self {
        Self::w3c()
    }
}

impl std::fmt::Debug for TracePropagator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracePropagator")
            .field("fields", &self.inner.fields().collect::<Vec<_>>())
            .finish()
    }
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl<'a> Extractor for HeaderExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|key| key.as_str()).collect()
    }
}

struct HeaderInjector<'a>(&'a mut HeaderMap);

impl<'a> Injector for HeaderInjector<'a> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            self.0.insert(name, value);
        }
    }
}

/// Trace id from a `00-{trace_id}-{span_id}-{flags}` header value.
pub fn parse_trace_id(traceparent: &str) -> Option<&str> {
    let mut parts = traceparent.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("00"), Some(trace_id), Some(_), Some(_)) => Some(trace_id),
        _ => None,
    }
}
