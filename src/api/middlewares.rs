mod record_metrics;
mod request_timeout;
mod trace_request;

pub use record_metrics::record_metrics;
pub use request_timeout::request_timeout;
pub use trace_request::trace_request;
