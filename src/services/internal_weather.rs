use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::instrument;
use url::Url;

use super::{TemperatureProvider, TracedClient};
use crate::{
    error::Error,
    models::{PostalCode, TemperatureSummary},
};

/// Client the Input Service uses to reach `GET {base}/weather/{cep}`.
#[derive(Debug, Clone)]
pub struct InternalWeatherService {
    client: TracedClient,
    base_url: Url,
}

impl InternalWeatherService {
    pub fn new(client: TracedClient, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).context("Invalid internal service url")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Internal service url cannot be a base: {}", base_url);
        }

        Ok(Self { client, base_url })
    }

    fn weather_url(&self, code: &PostalCode) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Internal service url cannot be a base"))?
            .pop_if_empty()
            .push("weather")
            .push(code.as_str());
        Ok(url)
    }
}

#[async_trait]
impl TemperatureProvider for InternalWeatherService {
    #[instrument(name = "InternalWeatherService.get_temperature", skip(self))]
    async fn get_temperature(&self, code: &str) -> Result<TemperatureSummary, Error> {
        let code = PostalCode::parse(code)?;
        let url = self.weather_url(&code)?;

        tracing::info!("Launching request to internal service");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to reach internal weather service")?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(Error::CodeNotFound),
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow!(
                    "error getting weather from internal service: {} {}",
                    status,
                    body
                )
                .into());
            }
        }

        let summary = response
            .json::<TemperatureSummary>()
            .await
            .context("Failed to decode internal service response")?;

        Ok(summary)
    }
}
