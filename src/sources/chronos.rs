use crate::types::{Forecast, ForecastRequest};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Forecast calls block a spawned task, not the ingestion cycle, but they
/// still get a hard ceiling.
const FORECAST_TIMEOUT_SECS: u64 = 15;

/// Client for the Chronos forecasting microservice.
#[derive(Clone)]
pub struct ChronosClient {
    client: Client,
    base_url: String,
}

impl ChronosClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(FORECAST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl super::Forecaster for ChronosClient {
    async fn forecast(&self, request: &ForecastRequest) -> anyhow::Result<Forecast> {
        let url = format!("{}/forecast", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "forecast service returned {}: {}",
                status,
                &text[..text.len().min(200)]
            );
            anyhow::bail!("forecast service error: {}", status);
        }

        Ok(response.json().await?)
    }
}
