use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::api_key::ApiKey;
use crate::core::currency::{ExchangeRateProvider, PairConversion};

const SUCCESS: &str = "success";

/// Client for the exchangerate-api.com v6 JSON API.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: ApiKey, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("xfx/1.0")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}/{}", self.base_url, self.api_key.value(), endpoint);
        // The key is part of the path, never log the full URL
        debug!("Requesting {}/<key>/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for endpoint: {}", e.without_url(), endpoint))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for endpoint: {}",
                response.status(),
                endpoint
            ));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", endpoint, e))
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    conversion_result: Option<f64>,
    conversion_rate: Option<f64>,
}

fn api_error(error_type: Option<String>) -> anyhow::Error {
    anyhow!(
        "API error: {}",
        error_type.as_deref().unwrap_or("Unknown error")
    )
}

#[async_trait]
impl ExchangeRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> Result<BTreeMap<String, f64>> {
        let data: LatestRatesResponse = self.get_json(&format!("latest/{base}")).await?;
        if data.result != SUCCESS {
            return Err(api_error(data.error_type));
        }

        debug!(count = data.conversion_rates.len(), "Received latest rates");
        Ok(data.conversion_rates)
    }

    #[instrument(name = "PairConvert", skip(self), fields(from = %from, to = %to))]
    async fn convert_pair(&self, from: &str, to: &str, amount: f64) -> Result<PairConversion> {
        let data: PairResponse = self
            .get_json(&format!("pair/{from}/{to}/{amount}"))
            .await?;
        if data.result != SUCCESS {
            return Err(api_error(data.error_type));
        }

        let result = data
            .conversion_result
            .ok_or_else(|| anyhow!("No conversion result for pair: {}/{}", from, to))?;

        Ok(PairConversion {
            result,
            rate: data.conversion_rate,
        })
    }
}
