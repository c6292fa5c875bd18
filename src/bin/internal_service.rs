use std::sync::Arc;

use anyhow::Result;
use otel_weather::{
    app::Application,
    config::{Config, Service},
    telemetry::{init_subscribers, Metrics, TracePropagator},
};
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let configuration = Config::build(Service::Internal)?;
    let _guard = init_subscribers(&configuration)?;

    if dotenv.is_err() {
        tracing::warn!("No .env file loaded, using environment variables");
    }
    if configuration.weather_provider.api_key.expose_secret().is_empty() {
        tracing::warn!("WEATHER_API_KEY is not set, weather lookups will be rejected");
    }

    let metrics = Arc::new(Metrics::build()?);
    let application =
        Application::build_internal(&configuration, metrics, TracePropagator::w3c()).await?;

    tracing::info!(
        service = %configuration.application.name,
        port = application.port(),
        "Starting weather service"
    );

    if let Err(err) = application.run_until_stopped().await {
        tracing::error!(error = ?err, "Failed to run the server");
        return Err(err);
    }

    Ok(())
}
