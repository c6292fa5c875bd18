use serde::{Deserialize, Serialize};

use super::{AddressRecord, WeatherSnapshot};

const KELVIN_OFFSET: f64 = 273.15;

/// Payload returned by both services on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl TemperatureSummary {
    pub fn new(city: impl Into<String>, celsius: f64, fahrenheit: f64) -> Self {
        Self {
            city: city.into(),
            temp_c: truncate_one_decimal(celsius),
            temp_f: truncate_one_decimal(fahrenheit),
            temp_k: truncate_one_decimal(celsius + KELVIN_OFFSET),
        }
    }

    pub fn from_lookup(address: &AddressRecord, weather: &WeatherSnapshot) -> Self {
        Self::new(
            address.locality.clone(),
            weather.current.temp_c,
            weather.current.temp_f,
        )
    }
}

/// Drops everything past the first decimal, toward zero. No rounding.
pub fn truncate_one_decimal(value: f64) -> f64 {
    (value * 10.0).trunc() / 10.0
}
