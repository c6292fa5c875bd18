use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::instrument;
use url::Url;

use super::{AddressProvider, TracedClient};
use crate::{
    error::Error,
    models::{AddressRecord, PostalCode},
};

/// Address lookup backed by ViaCEP (`GET {base}/{cep}/json/`).
#[derive(Debug, Clone)]
pub struct ViaCepService {
    client: TracedClient,
    base_url: Url,
}

impl ViaCepService {
    pub fn new(client: TracedClient, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).context("Invalid address provider url")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Address provider url cannot be a base: {}", base_url);
        }

        Ok(Self { client, base_url })
    }

    fn address_url(&self, code: &PostalCode) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Address provider url cannot be a base"))?
            .pop_if_empty()
            .push(code.as_str())
            .push("json")
            .push("");
        Ok(url)
    }
}

#[async_trait]
impl AddressProvider for ViaCepService {
    #[instrument(name = "ViaCepService.get_address", skip(self), fields(cep = %code))]
    async fn get_address(&self, code: &PostalCode) -> Result<AddressRecord, Error> {
        let url = self.address_url(code)?;

        tracing::info!("Launching request to external service");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to request address from ViaCEP")?;

        let status = response.status();
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("error getting address: {} {}", status.as_u16(), body).into());
        }
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "ViaCEP rejected postal code");
            return Err(Error::InvalidCode);
        }

        let address: AddressRecord = response
            .json()
            .await
            .context("Failed to decode ViaCEP response")?;

        if address.not_found {
            tracing::warn!(?address, "ViaCEP has no address for postal code");
            return Err(Error::CodeNotFound);
        }

        Ok(address)
    }
}
