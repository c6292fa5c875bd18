mod metrics;
mod propagation;
mod subscriber;

pub use metrics::Metrics;
pub use propagation::{parse_trace_id, TracePropagator, TRACEPARENT};
pub use subscriber::{init_subscribers, TelemetryGuard};
