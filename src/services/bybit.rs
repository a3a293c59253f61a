//! Bybit v5 REST kline provider

use crate::config;
use crate::error::MarketDataError;
use crate::models::bar::Bar;
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Bybit caps a kline request at 1000 rows
pub const MAX_KLINE_LIMIT: usize = 1000;
const DEFAULT_MAX_RETRIES: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KlineResponse {
    ret_code: i64,
    #[serde(default)]
    ret_msg: String,
    result: Option<KlineResult>,
}

#[derive(Debug, Deserialize)]
struct KlineResult {
    list: Option<Vec<Vec<String>>>,
}

pub struct BybitMarketDataProvider {
    client: reqwest::Client,
    base_url: String,
    category: String,
    max_retries: usize,
}

impl BybitMarketDataProvider {
    pub fn new() -> Self {
        Self::with_client(config::get_bybit_base_url(), reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            category: "linear".to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Retries after the first attempt for transient failures
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn fetch_once(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Bar>, MarketDataError> {
        let url = format!("{}/v5/market/kline", self.base_url);
        let limit = limit.clamp(1, MAX_KLINE_LIMIT).to_string();

        let body = self
            .client
            .get(&url)
            .query(&[
                ("category", self.category.as_str()),
                ("symbol", symbol),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: KlineResponse = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::Malformed(e.to_string()))?;

        if response.ret_code != 0 {
            return Err(MarketDataError::Api {
                code: response.ret_code,
                message: response.ret_msg,
            });
        }

        let rows = response
            .result
            .and_then(|r| r.list)
            .ok_or_else(|| MarketDataError::Api {
                code: response.ret_code,
                message: format!("missing kline list: {}", response.ret_msg),
            })?;

        parse_kline_rows(&rows)
    }
}

impl Default for BybitMarketDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert Bybit kline rows (newest first, string fields
/// `[start, open, high, low, close, volume, turnover]`) into ascending bars.
pub fn parse_kline_rows(rows: &[Vec<String>]) -> Result<Vec<Bar>, MarketDataError> {
    let mut bars = rows
        .iter()
        .map(|row| {
            if row.len() < 6 {
                return Err(MarketDataError::Malformed(format!(
                    "kline row has {} fields, expected at least 6",
                    row.len()
                )));
            }
            let time = row[0]
                .parse::<i64>()
                .map_err(|e| MarketDataError::Malformed(format!("invalid start time '{}': {}", row[0], e)))?;
            let number = |i: usize, name: &str| {
                row[i]
                    .parse::<f64>()
                    .map_err(|e| MarketDataError::Malformed(format!("invalid {} '{}': {}", name, row[i], e)))
            };

            Ok(Bar::new(
                time,
                number(1, "open")?,
                number(2, "high")?,
                number(3, "low")?,
                number(4, "close")?,
                number(5, "volume")?,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    bars.sort_by_key(|b| b.time);
    bars.dedup_by_key(|b| b.time);
    Ok(bars)
}

#[async_trait]
impl MarketDataProvider for BybitMarketDataProvider {
    async fn get_bars(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Bar>, MarketDataError> {
        let bars = (|| self.fetch_once(symbol, interval, limit))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_times(self.max_retries),
            )
            .sleep(tokio::time::sleep)
            .when(MarketDataError::is_retryable)
            .notify(|err: &MarketDataError, delay: Duration| {
                warn!(
                    symbol = %symbol,
                    error = %err,
                    retry_in_ms = delay.as_millis() as u64,
                    "Bybit kline request failed, retrying"
                );
            })
            .await?;

        debug!(symbol = %symbol, interval = %interval, count = bars.len(), "Fetched {} bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}
