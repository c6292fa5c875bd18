pub mod input;
pub mod internal;
pub mod metrics;
