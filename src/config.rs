use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::prelude::*;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub application: ApplicationConfig,
    pub telemetry: TelemetryConfig,
    pub internal_service: InternalServiceConfig,
    pub address_provider: AddressProviderConfig,
    pub weather_provider: WeatherProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationConfig {
    pub name: String,
    pub version: String,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub shutdown_grace_period_secs: u64,
}

impl ApplicationConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace_period(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_period_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct TelemetryConfig {
    pub exporter: SpanExporterKind,
    pub otlp_endpoint: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanExporterKind {
    Otlp,
    Stdout,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Deserialize)]
pub struct InternalServiceConfig {
    pub url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

impl InternalServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct AddressProviderConfig {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherProviderConfig {
    pub url: String,
    pub api_key: SecretString,
}

/// Which of the two binaries is loading its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Input,
    Internal,
}

impl Service {
    pub fn default_name(&self) -> &'static str {
        match self {
            Service::Input => "input-service",
            Service::Internal => "weather-service",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Service::Input => 8080,
            Service::Internal => 8081,
        }
    }
}

impl Config {
    pub fn build(service: Service) -> Result<Self> {
        Self::build_with(service, get_env_var)
    }

    /// Builds the configuration reading the legacy variables through `lookup`.
    pub fn build_with<F>(service: Service, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_path = std::env::current_dir().context("Failed to determine current directory")?;
        let configuration_directory = base_path.join("configs");

        let environment: Environment = lookup("APP_ENVIRONMENT")
            .unwrap_or_else(|| "dev".into())
            .try_into()
            .map_err(|err: String| anyhow::anyhow!(err))
            .context("Failed to parse APP_ENVIRONMENT")?;
        let environment_filename = format!("{}.toml", environment.as_str());

        let mut settings = config::Config::builder()
            .set_default("application.name", service.default_name())?
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", i64::from(service.default_port()))?
            .set_default("application.request_timeout_secs", 10)?
            .set_default("application.shutdown_grace_period_secs", 10)?
            .set_default("telemetry.exporter", "otlp")?
            .set_default("telemetry.otlp_endpoint", "http://localhost:4317")?
            .set_default("telemetry.log_format", "json")?
            .set_default("internal_service.url", "http://localhost:8081")?
            .set_default("internal_service.timeout_secs", 10)?
            .set_default("address_provider.url", "https://viacep.com.br/ws")?
            .set_default(
                "weather_provider.url",
                "https://api.weatherapi.com/v1/current.json",
            )?
            .set_default("weather_provider.api_key", "")?
            .add_source(
                config::File::from(configuration_directory.join("base.toml")).required(false),
            )
            .add_source(
                config::File::from(configuration_directory.join(environment_filename))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override("application.version", env!("CARGO_PKG_VERSION"))?;

        if let Some(name) = lookup("SERVICE_NAME") {
            settings = settings.set_override("application.name", name)?;
        }
        if let Some(endpoint) = lookup("OTEL_EXPORTER_OTLP_ENDPOINT") {
            settings = settings.set_override("telemetry.otlp_endpoint", endpoint)?;
        }
        if let Some(url) = lookup("WEATHER_SERVICE_URL") {
            settings = settings.set_override("internal_service.url", url)?;
        }
        if let Some(api_key) = lookup("WEATHER_API_KEY") {
            settings = settings.set_override("weather_provider.api_key", api_key)?;
        }

        let settings = settings.build().context("Failed to build configuration")?;

        settings
            .try_deserialize::<Config>()
            .context("Failed to deserialize configuration")
    }
}

fn get_env_var(name: &str) -> Option<String> {
    let var = std::env::var(name).ok()?;
    if var.is_empty() {
        return None;
    }
    Some(var)
}

pub enum Environment {
    Development,
    Production,
    Staging,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Production => "production",
            Environment::Staging => "staging",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "dev" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            other => Err(format!("{} is not a valid environment", other)),
        }
    }
}
