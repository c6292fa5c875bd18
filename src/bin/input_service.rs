use std::sync::Arc;

use anyhow::Result;
use otel_weather::{
    app::Application,
    config::{Config, Service},
    telemetry::{init_subscribers, Metrics, TracePropagator},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let configuration = Config::build(Service::Input)?;
    let _guard = init_subscribers(&configuration)?;

    let metrics = Arc::new(Metrics::build()?);
    let application =
        Application::build_input(&configuration, metrics, TracePropagator::w3c()).await?;

    tracing::info!(
        service = %configuration.application.name,
        port = application.port(),
        internal_service = %configuration.internal_service.url,
        "Starting input service"
    );

    if let Err(err) = application.run_until_stopped().await {
        tracing::error!(error = ?err, "Failed to run the server");
        return Err(err);
    }

    Ok(())
}
