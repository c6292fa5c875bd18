use std::time::Duration;

use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::Error;

/// Drops the handler once `timeout` elapses and answers with an unclassified
/// error, so the failure is logged and surfaces as a 500.
pub async fn request_timeout(
    State(timeout): State<Duration>,
    req: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(timeout, next.run(req)).await {
        Ok(response) => response,
        Err(_) => Error::from(anyhow!("request timed out after {:?}", timeout)).into_response(),
    }
}
