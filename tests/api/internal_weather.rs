use std::time::Duration;

use anyhow::Result;
use httpmock::prelude::*;
use otel_weather::config::Service;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::{
    spawn_internal_app, spawn_internal_with, spawn_stub, test_configuration, Providers, TestApp,
};

async fn spawn(providers: &Providers) -> Result<TestApp> {
    spawn_internal_app(
        &providers.via_cep.url("/ws"),
        &providers.weather_api.url("/v1/current.json"),
    )
    .await
}

fn weather_body(city: &str, temp_c: f64, temp_f: f64) -> Value {
    json!({
        "location": { "name": city, "region": "Sao Paulo", "country": "Brazil" },
        "current": {
            "temp_c": temp_c,
            "temp_f": temp_f,
            "condition": { "text": "Partly cloudy" }
        }
    })
}

#[tokio::test]
async fn returns_temperatures_for_a_known_postal_code() -> Result<()> {
    // Arrange
    let providers = Providers::start();
    let address = providers.via_cep.mock(|when, then| {
        when.method(GET).path("/ws/01001000/json/");
        then.status(200).json_body(json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP"
        }));
    });
    let weather = providers.weather_api.mock(|when, then| {
        when.method(GET)
            .path("/v1/current.json")
            .query_param("key", "test-key")
            .query_param_exists("q");
        then.status(200)
            .json_body(weather_body("Sao Paulo", 20.46, 68.83));
    });
    let app = spawn(&providers).await?;

    // Act
    let response = app.get_weather("01001000").await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(
        body,
        json!({ "city": "São Paulo", "temp_C": 20.4, "temp_F": 68.8, "temp_K": 293.6 })
    );
    assert_eq!(address.calls(), 1);
    assert_eq!(weather.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn wrong_length_returns_422_without_calling_providers() -> Result<()> {
    // Arrange
    let providers = Providers::start();
    let address = providers.via_cep.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!({ "localidade": "Natal" }));
    });
    let weather = providers.weather_api.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(weather_body("Natal", 30.0, 86.0));
    });
    let app = spawn(&providers).await?;

    for zip_code in ["123", "1234567", "123456789"] {
        // Act
        let response = app.get_weather(zip_code).await?;

        // Assert
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{zip_code}");
        let body: Value = response.json().await?;
        assert_eq!(body["message"], "invalid zipcode");
    }
    assert_eq!(address.calls(), 0);
    assert_eq!(weather.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn unknown_postal_code_returns_404() -> Result<()> {
    // Arrange
    let providers = Providers::start();
    providers.via_cep.mock(|when, then| {
        when.method(GET).path("/ws/99999999/json/");
        then.status(200).json_body(json!({ "erro": true }));
    });
    let weather = providers.weather_api.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(weather_body("Nowhere", 0.0, 32.0));
    });
    let app = spawn(&providers).await?;

    // Act
    let response = app.get_weather("99999999").await?;

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "can not find zipcode");
    assert_eq!(weather.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn postal_code_rejected_by_viacep_returns_422() -> Result<()> {
    // Arrange
    let providers = Providers::start();
    providers.via_cep.mock(|when, then| {
        when.method(GET).path("/ws/abcdefgh/json/");
        then.status(400).body("<h1>Http 400</h1>");
    });
    let app = spawn(&providers).await?;

    // Act
    let response = app.get_weather("abcdefgh").await?;

    // Assert
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

#[tokio::test]
async fn address_provider_failure_returns_500() -> Result<()> {
    // Arrange
    let providers = Providers::start();
    providers.via_cep.mock(|when, then| {
        when.method(GET).path("/ws/01001000/json/");
        then.status(500).body("internal error");
    });
    let app = spawn(&providers).await?;

    // Act
    let response = app.get_weather("01001000").await?;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "internal server error");

    Ok(())
}

#[tokio::test]
async fn weather_provider_failure_returns_500() -> Result<()> {
    // Arrange
    let providers = Providers::start();
    providers.via_cep.mock(|when, then| {
        when.method(GET).path("/ws/01001000/json/");
        then.status(200).json_body(json!({ "localidade": "São Paulo" }));
    });
    providers.weather_api.mock(|when, then| {
        when.method(GET).path("/v1/current.json");
        then.status(403)
            .json_body(json!({ "error": { "code": 2008, "message": "API key has been disabled." } }));
    });
    let app = spawn(&providers).await?;

    // Act
    let response = app.get_weather("01001000").await?;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test]
async fn slow_address_provider_returns_500_once_the_request_times_out() -> Result<()> {
    // Arrange
    let via_cep = spawn_stub(
        StatusCode::OK,
        json!({ "localidade": "São Paulo" }),
        Duration::from_secs(3),
    )
    .await?;
    let weather_api = MockServer::start();
    let mut configuration = test_configuration(Service::Internal)?;
    configuration.application.request_timeout_secs = 1;
    configuration.address_provider.url = format!("{}/ws", via_cep.address);
    configuration.weather_provider.url = weather_api.url("/v1/current.json");
    let app = spawn_internal_with(configuration).await?;

    // Act
    let response = app.get_weather("01001000").await?;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "internal server error");

    Ok(())
}
