use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use opentelemetry::trace::TraceContextExt;
use tracing::{field::Empty, Instrument, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::telemetry::TracePropagator;

/// Opens the server span for a request, parented on the caller's trace context.
pub async fn trace_request(
    State(propagator): State<TracePropagator>,
    req: Request,
    next: Next,
) -> Response {
    let parent = propagator.extract(req.headers());

    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_string(), |matched| {
            matched.as_str().to_string()
        });
    let method = req.method().clone();

    let span = tracing::info_span!(
        "http_request",
        otel.name = %format!("{} {}", method, route),
        otel.kind = "server",
        http.request.method = %method,
        http.route = %route,
        http.response.status_code = Empty,
        trace_id = Empty,
    );
    span.set_parent(parent);
    record_trace_id(&span);

    let response = next.run(req).instrument(span.clone()).await;

    span.record("http.response.status_code", response.status().as_u16());

    response
}

fn record_trace_id(span: &Span) {
    let context = span.context();
    let otel_context = context.span().span_context().clone();
    if otel_context.is_valid() {
        let trace_id = otel_context.trace_id().to_string();
        span.record("trace_id", trace_id);
    }
}
