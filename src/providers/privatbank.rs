use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::with_timeout;
use crate::core::config::AppConfig;
use crate::core::error::RateError;
use crate::core::rate::{
    Currency, CurrencyQuote, CurrencyRates, DateKey, DateRecord, RateProvider,
};

const EXCHANGE_RATES_PATH: &str = "/p24api/exchange_rates";

/// Client for the PrivatBank archive endpoint. One instance, and therefore one
/// connection pool, is shared by every date fetched in a run.
pub struct PrivatBankProvider {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl PrivatBankProvider {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(PrivatBankProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.providers.privatbank.base_url,
            &config.user_agent,
            config.timeout(),
        )
    }

    fn url_for(&self, date: DateKey) -> String {
        format!("{}{}?json&date={}", self.base_url, EXCHANGE_RATES_PATH, date)
    }

    async fn request(&self, date: DateKey) -> Result<DateRecord> {
        let url = self.url_for(date);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request error for {date}"))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RateError::Status { date, status }.into());
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body for {date}"))?;

        let data: ArchiveResponse = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response for {date}"))?;

        Ok(data.into_record(date))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveResponse {
    #[serde(default)]
    exchange_rate: Vec<ExchangeRateItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeRateItem {
    currency: Option<String>,
    sale_rate: Option<f64>,
    purchase_rate: Option<f64>,
}

impl ArchiveResponse {
    fn into_record(self, date: DateKey) -> DateRecord {
        let mut rates = CurrencyRates::default();
        for item in self.exchange_rate {
            let Some(currency) = item
                .currency
                .as_deref()
                .and_then(|c| c.parse::<Currency>().ok())
            else {
                continue;
            };
            rates.set(
                currency,
                CurrencyQuote {
                    sale: item.sale_rate,
                    purchase: item.purchase_rate,
                },
            );
        }
        DateRecord { date, rates }
    }
}

#[async_trait]
impl RateProvider for PrivatBankProvider {
    #[instrument(name = "PrivatBankFetch", skip(self), fields(date = %date))]
    async fn fetch_rates(&self, date: DateKey) -> Result<DateRecord> {
        with_timeout(date, self.timeout, self.request(date)).await
    }
}
