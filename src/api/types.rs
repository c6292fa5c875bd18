use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::services::{AddressProvider, TemperatureProvider, WeatherProvider};

/// State behind `POST /weather` on the Input Service.
#[derive(Clone)]
pub struct InputState {
    pub temperatures: Arc<dyn TemperatureProvider>,
}

/// State behind `GET /weather/:zip_code` on the Internal Service.
#[derive(Clone)]
pub struct InternalState {
    pub addresses: Arc<dyn AddressProvider>,
    pub weather: Arc<dyn WeatherProvider>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
