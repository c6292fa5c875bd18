use std::time::{Duration, Instant};

use anyhow::Result;
use otel_weather::config::Service;
use reqwest::StatusCode;
use serde_json::json;

use crate::helpers::{spawn_input_app, spawn_input_with, spawn_stub, test_configuration};

fn summary() -> serde_json::Value {
    json!({ "city": "Recife", "temp_C": 28.0, "temp_F": 82.4, "temp_K": 301.1 })
}

#[tokio::test]
async fn in_flight_requests_complete_before_exit() -> Result<()> {
    // Arrange
    let internal = spawn_stub(StatusCode::OK, summary(), Duration::from_millis(500)).await?;
    let input = spawn_input_app(&internal.address).await?;
    let client = input.client.clone();
    let address = input.address.clone();
    let in_flight = tokio::spawn({
        let client = client.clone();
        let address = address.clone();
        async move {
            client
                .post(format!("{}/weather", address))
                .json(&json!({ "cep": "50030230" }))
                .send()
                .await
        }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Act
    input.stop().await?;

    // Assert
    let response = in_flight.await??;
    assert_eq!(response.status(), StatusCode::OK);
    let refused = reqwest::Client::new()
        .post(format!("{}/weather", address))
        .json(&json!({ "cep": "50030230" }))
        .send()
        .await;
    assert!(refused.is_err(), "server still accepting connections");

    Ok(())
}

#[tokio::test]
async fn exits_once_the_grace_period_runs_out() -> Result<()> {
    // Arrange
    let internal = spawn_stub(StatusCode::OK, summary(), Duration::from_secs(10)).await?;
    let mut configuration = test_configuration(Service::Input)?;
    configuration.internal_service.url = internal.address.clone();
    configuration.internal_service.timeout_secs = 30;
    configuration.application.request_timeout_secs = 30;
    configuration.application.shutdown_grace_period_secs = 1;
    let input = spawn_input_with(configuration).await?;
    let client = input.client.clone();
    let address = input.address.clone();
    tokio::spawn(async move {
        client
            .post(format!("{}/weather", address))
            .json(&json!({ "cep": "50030230" }))
            .send()
            .await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Act
    let started = Instant::now();
    input.stop().await?;

    // Assert
    assert!(started.elapsed() < Duration::from_secs(5));

    Ok(())
}
