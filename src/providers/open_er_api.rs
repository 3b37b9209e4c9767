use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::config::ProviderConfig;
use crate::core::currency::{CurrencyCode, RateProvider, RateSnapshot};
use crate::core::error::ConverterError;

/// Client for the open.er-api.com "latest rates" endpoint.
pub struct OpenErApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OpenErApiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(OpenErApiProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    rates: Option<HashMap<String, f64>>,
}

fn parse_latest_rates(base: CurrencyCode, body: &str) -> Result<RateSnapshot, ConverterError> {
    let data: LatestRatesResponse = serde_json::from_str(body).map_err(|e| {
        ConverterError::Protocol(format!("Failed to parse JSON response for {base}: {e}"))
    })?;

    if data.result != "success" {
        return Err(ConverterError::ProviderRejected(
            data.error_type.unwrap_or(data.result),
        ));
    }

    let rates = data
        .rates
        .ok_or_else(|| ConverterError::Protocol(format!("No rates in response for {base}")))?;

    // Codes outside the allow-list are of no use to either front-end.
    let rates: HashMap<CurrencyCode, f64> = rates
        .into_iter()
        .filter_map(|(code, rate)| {
            let code = code.parse::<CurrencyCode>().ok()?;
            (rate.is_finite() && rate > 0.0).then_some((code, rate))
        })
        .collect();
    debug!(count = rates.len(), "Parsed supported rates");

    Ok(RateSnapshot::new(base, rates))
}

#[async_trait]
impl RateProvider for OpenErApiProvider {
    #[instrument(name = "OpenErApiFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateSnapshot, ConverterError> {
        let url = format!("{}/v6/latest/{}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ConverterError::ConnectivityFailure(e.to_string()))?;

        debug!(response = ?response, "Received rates response");

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ConverterError::ProviderUnavailable(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ConverterError::ConnectivityFailure(e.to_string()))?;

        parse_latest_rates(base, &body)
    }
}
