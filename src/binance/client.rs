// =============================================================================
// Binance REST API Client — public market data
// =============================================================================
//
// Only the public, unsigned klines endpoint is used; no API keys are needed.
// The request timeout is bounded at the reqwest client level so a hung
// exchange can never stall the acquisition loop past one tick.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::types::Candle;

/// Binance REST client for public market-data endpoints.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    /// Create a new client against `base_url` (e.g. `https://api.binance.com`)
    /// with the given request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// GET /api/v3/klines — fetch up to `limit` most recent candles.
    ///
    /// Returns candles oldest-first, as delivered by Binance. Rate-limit
    /// statuses (418/429) and any other non-success status become errors for
    /// the caller to log and retry at the next tick.
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url, symbol, interval, limit
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /api/v3/klines request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse klines response")?;

        if status.as_u16() == 429 || status.as_u16() == 418 {
            anyhow::bail!("Binance rate limit hit ({status}): {body}");
        }
        if !status.is_success() {
            anyhow::bail!("Binance GET /api/v3/klines returned {status}: {body}");
        }

        let candles = parse_klines(&body)?;
        debug!(symbol, interval, count = candles.len(), "klines fetched");
        Ok(candles)
    }
}

/// Parse Binance's array-of-arrays klines response.
///
/// Array indices:
///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume
///
/// Rows shorter than 6 elements are skipped with a warning rather than
/// failing the whole batch.
pub fn parse_klines(body: &serde_json::Value) -> Result<Vec<Candle>> {
    let raw = body.as_array().context("klines response is not an array")?;

    let mut candles = Vec::with_capacity(raw.len());
    for entry in raw {
        let arr = entry.as_array().context("kline entry is not an array")?;

        if arr.len() < 6 {
            warn!("skipping malformed kline entry with {} elements", arr.len());
            continue;
        }

        let timestamp = arr[0].as_i64().context("kline openTime is not an integer")?;
        let open = parse_str_f64(&arr[1])?;
        let high = parse_str_f64(&arr[2])?;
        let low = parse_str_f64(&arr[3])?;
        let close = parse_str_f64(&arr[4])?;
        let volume = parse_str_f64(&arr[5])?;

        candles.push(Candle::new(timestamp, open, high, low, close, volume));
    }

    Ok(candles)
}

/// Binance sends numeric values as JSON strings inside kline rows; accept
/// either a string or a bare number.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    }
}
