use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    serve::Serve,
    Json, Router,
};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::trace::TraceLayer;

use crate::{
    config::ApplicationConfig,
    telemetry::{Metrics, TracePropagator},
};
use types::ApiMessage;

mod middlewares;
pub mod routes;
pub mod types;

pub struct Api {
    port: u16,
    server: Serve<Router, Router>,
}

impl Api {
    /// Binds the listener and wraps `router` with the shared routes and layers.
    pub async fn build(
        configuration: &ApplicationConfig,
        router: Router,
        metrics: Arc<Metrics>,
        propagator: TracePropagator,
    ) -> Result<Self> {
        let listener = TcpListener::bind(configuration.address())
            .await
            .context("Failed to bind address")?;
        let port = listener
            .local_addr()
            .context("Failed to get local address")?
            .port();

        let router = router
            .merge(routes::metrics::create_router(metrics.clone()))
            .route("/health", get(health_check))
            .fallback(not_found)
            .layer(TraceLayer::new_for_http())
            .layer(from_fn_with_state(
                configuration.request_timeout(),
                middlewares::request_timeout,
            ))
            .layer(from_fn_with_state(metrics, middlewares::record_metrics))
            .layer(from_fn_with_state(propagator, middlewares::trace_request));

        let server = axum::serve(listener, router);

        Ok(Self { port, server })
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests for at
    /// most `grace_period`.
    ///
    /// Past the grace period only the accept loop is aborted: connection tasks
    /// spawned by `axum::serve` keep running until the runtime is dropped, which
    /// for the binaries happens right after this returns from `main`.
    pub async fn run_until_stopped<F>(self, shutdown: F, grace_period: Duration) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (drain_tx, drain_rx) = oneshot::channel::<()>();
        let server = self.server.with_graceful_shutdown(async move {
            let _ = drain_rx.await;
        });
        let mut serving = tokio::spawn(async move { server.await });

        tokio::select! {
            result = &mut serving => {
                return result
                    .context("Server task panicked")?
                    .context("Server failed");
            }
            _ = shutdown => {
                tracing::warn!("Shutting down gracefully");
            }
        }

        let _ = drain_tx.send(());

        match tokio::time::timeout(grace_period, &mut serving).await {
            Ok(result) => result
                .context("Server task panicked")?
                .context("Server failed while draining")?,
            Err(_) => {
                tracing::warn!(?grace_period, "Server forced to shutdown");
                serving.abort();
            }
        }

        tracing::warn!("Server exiting");
        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

async fn health_check() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ApiMessage::new("Not Found")))
}
