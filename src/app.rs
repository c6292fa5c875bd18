use std::{future::Future, sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;

use crate::{
    api::{
        routes,
        types::{InputState, InternalState},
        Api,
    },
    config::Config,
    services::{InternalWeatherService, TracedClient, ViaCepService, WeatherApiService},
    telemetry::{Metrics, TracePropagator},
};

pub struct Application {
    pub api: Api,
    grace_period: Duration,
}

impl Application {
    /// Public-facing service: `POST /weather`, relayed to the Internal Service.
    pub async fn build_input(
        configuration: &Config,
        metrics: Arc<Metrics>,
        propagator: TracePropagator,
    ) -> Result<Self> {
        let client = TracedClient::new(propagator.clone(), configuration.internal_service.timeout())?;
        let temperatures =
            InternalWeatherService::new(client, &configuration.internal_service.url)?;

        let state = InputState {
            temperatures: Arc::new(temperatures),
        };

        Self::build(
            configuration,
            routes::input::create_router(state),
            metrics,
            propagator,
        )
        .await
    }

    /// `GET /weather/:zip_code`, backed by ViaCEP and WeatherAPI.
    pub async fn build_internal(
        configuration: &Config,
        metrics: Arc<Metrics>,
        propagator: TracePropagator,
    ) -> Result<Self> {
        let client = TracedClient::new(
            propagator.clone(),
            configuration.application.request_timeout(),
        )?;
        let addresses = ViaCepService::new(client.clone(), &configuration.address_provider.url)?;
        let weather = WeatherApiService::new(
            client,
            &configuration.weather_provider.url,
            configuration.weather_provider.api_key.clone(),
        )?;

        let state = InternalState {
            addresses: Arc::new(addresses),
            weather: Arc::new(weather),
        };

        Self::build(
            configuration,
            routes::internal::create_router(state),
            metrics,
            propagator,
        )
        .await
    }

    pub async fn build(
        configuration: &Config,
        router: Router,
        metrics: Arc<Metrics>,
        propagator: TracePropagator,
    ) -> Result<Self> {
        let api = Api::build(&configuration.application, router, metrics, propagator).await?;

        Ok(Self {
            api,
            grace_period: configuration.application.shutdown_grace_period(),
        })
    }

    pub async fn run_until_stopped(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.api.run_until_stopped(shutdown, self.grace_period).await
    }

    pub fn port(&self) -> u16 {
        self.api.port()
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutdown signal received (Ctrl+C)"),
        _ = terminate => tracing::info!("Shutdown signal received (SIGTERM)"),
    }
}
