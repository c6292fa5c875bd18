use async_trait::async_trait;

use crate::{
    error::Error,
    models::{AddressRecord, PostalCode, TemperatureSummary, WeatherSnapshot},
};

pub mod internal_weather;
mod traced_client;
pub mod via_cep;
pub mod weather_api;

pub use internal_weather::InternalWeatherService;
pub use traced_client::TracedClient;
pub use via_cep::ViaCepService;
pub use weather_api::WeatherApiService;

/// Resolves a postal code to an address.
#[async_trait]
pub trait AddressProvider: Send + Sync {
    async fn get_address(&self, code: &PostalCode) -> Result<AddressRecord, Error>;
}

/// Resolves a locality to its current weather.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn get_weather(&self, city: &str) -> Result<WeatherSnapshot, Error>;
}

/// Resolves a raw postal code to a temperature summary; what the Input Service
/// calls the Internal Service through.
#[async_trait]
pub trait TemperatureProvider: Send + Sync {
    async fn get_temperature(&self, code: &str) -> Result<TemperatureSummary, Error>;
}
