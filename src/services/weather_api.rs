use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use super::{TracedClient, WeatherProvider};
use crate::{error::Error, models::WeatherSnapshot};

/// Current conditions backed by WeatherAPI (`GET {base}?key=..&q=..`).
#[derive(Debug, Clone)]
pub struct WeatherApiService {
    client: TracedClient,
    base_url: Url,
    api_key: SecretString,
}

impl WeatherApiService {
    pub fn new(client: TracedClient, base_url: &str, api_key: SecretString) -> Result<Self> {
        let base_url = Url::parse(base_url).context("Invalid weather provider url")?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn weather_url(&self, city: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("key", self.api_key.expose_secret())
            .append_pair("q", city);
        url
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiService {
    #[instrument(name = "WeatherApiService.get_weather", skip(self))]
    async fn get_weather(&self, city: &str) -> Result<WeatherSnapshot, Error> {
        let url = self.weather_url(city);

        tracing::info!("Launching request to external service");
        // The url carries the api key, keep it out of error messages.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| err.without_url())
            .context("Failed to request weather from WeatherAPI")?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "Error getting weather");
            return Err(anyhow::anyhow!("error getting weather: {}", status.as_u16()).into());
        }

        let weather = response
            .json::<WeatherSnapshot>()
            .await
            .map_err(|err| err.without_url())
            .context("Failed to decode WeatherAPI response")?;

        Ok(weather)
    }
}
