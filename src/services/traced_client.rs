use std::time::Duration;

use anyhow::{Context, Result};
use http::HeaderMap;
use reqwest::{Client, IntoUrl, RequestBuilder};

use crate::telemetry::TracePropagator;

/// reqwest client that stamps the current trace context on every request.
#[derive(Debug, Clone)]
pub struct TracedClient {
    client: Client,
    propagator: TracePropagator,
}

impl TracedClient {
    pub fn new(propagator: TracePropagator, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, propagator })
    }

    /// Must be called inside the span the outbound call belongs to.
    pub fn get<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        self.propagator.inject_current(&mut headers);

        self.client.get(url).headers(headers)
    }
}
