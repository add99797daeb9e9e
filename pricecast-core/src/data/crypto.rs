//! Crypto OHLC provider.
//!
//! Fetches daily klines from a Binance-compatible REST endpoint. The wire
//! format is an array of arrays with numeric fields encoded as strings:
//!   [open_time_ms, "open", "high", "low", "close", "volume", close_time, ...]
//! Tickers are resolved to exchange pairs through the [`PairMap`].

use super::pair_map::PairMap;
use super::provider::{BarProvider, History, HistoryError, HistorySource};
use crate::domain::PriceBar;
use chrono::DateTime;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const DEFAULT_LIMIT: usize = 365;

pub struct CryptoOhlcProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    pairs: PairMap,
    limit: usize,
}

impl CryptoOhlcProvider {
    pub fn new(pairs: PairMap) -> Result<Self, HistoryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HistoryError::NetworkUnreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            pairs,
            limit: DEFAULT_LIMIT,
        })
    }

    /// Point the provider at a different host (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether the pair map routes this ticker to an exchange pair.
    pub fn serves(&self, ticker: &str) -> bool {
        self.pairs.contains(ticker)
    }

    fn klines_url(&self, pair: &str) -> String {
        format!(
            "{}/api/v3/klines?symbol={pair}&interval=1d&limit={}",
            self.base_url, self.limit
        )
    }

    /// Parse the klines payload into bars.
    fn parse_klines(ticker: &str, payload: &serde_json::Value) -> Result<Vec<PriceBar>, HistoryError> {
        // An object instead of an array is the exchange's error envelope.
        if let Some(obj) = payload.as_object() {
            let msg = obj
                .get("msg")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            if msg.to_ascii_lowercase().contains("invalid symbol") {
                return Err(HistoryError::TickerNotFound {
                    ticker: ticker.to_string(),
                });
            }
            return Err(HistoryError::MalformedResponse(msg.to_string()));
        }

        let rows = payload
            .as_array()
            .ok_or_else(|| HistoryError::MalformedResponse("klines payload is not an array".into()))?;

        let mut bars = Vec::with_capacity(rows.len());
        for row in rows {
            let fields = row.as_array().ok_or_else(|| {
                HistoryError::MalformedResponse("kline row is not an array".into())
            })?;
            if fields.len() < 6 {
                return Err(HistoryError::MalformedResponse(format!(
                    "kline row has {} fields, expected at least 6",
                    fields.len()
                )));
            }

            let open_time = fields[0].as_i64().ok_or_else(|| {
                HistoryError::MalformedResponse("kline open time is not an integer".into())
            })?;
            let timestamp = DateTime::from_timestamp_millis(open_time).ok_or_else(|| {
                HistoryError::MalformedResponse(format!("invalid open time: {open_time}"))
            })?;

            bars.push(PriceBar {
                timestamp,
                open: Some(price_field(&fields[1])?),
                high: price_field(&fields[2])?,
                low: price_field(&fields[3])?,
                close: price_field(&fields[4])?,
                volume: price_field(&fields[5])?,
            });
        }

        if bars.is_empty() {
            return Err(HistoryError::EmptyHistory {
                ticker: ticker.to_string(),
            });
        }

        Ok(bars)
    }
}

/// Klines encode numbers as JSON strings; some mirrors use plain numbers.
fn price_field(value: &serde_json::Value) -> Result<f64, HistoryError> {
    if let Some(s) = value.as_str() {
        return s
            .parse::<f64>()
            .map_err(|_| HistoryError::MalformedResponse(format!("non-numeric field: {s:?}")));
    }
    value
        .as_f64()
        .ok_or_else(|| HistoryError::MalformedResponse(format!("non-numeric field: {value}")))
}

impl BarProvider for CryptoOhlcProvider {
    fn name(&self) -> &str {
        "crypto_ohlc"
    }

    fn fetch(&self, ticker: &str) -> Result<History, HistoryError> {
        let pair = self
            .pairs
            .pair_for(ticker)
            .ok_or_else(|| HistoryError::TickerNotFound {
                ticker: ticker.to_string(),
            })?;

        let url = self.klines_url(pair);
        log::debug!("{}: GET {url}", self.name());

        let resp = self.client.get(&url).send().map_err(|e| {
            HistoryError::NetworkUnreachable(e.to_string())
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(HistoryError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HistoryError::TickerNotFound {
                ticker: ticker.to_string(),
            });
        }

        let payload: serde_json::Value = resp
            .json()
            .map_err(|e| HistoryError::MalformedResponse(format!("parse klines for {pair}: {e}")))?;

        let bars = Self::parse_klines(ticker, &payload)?;
        Ok(History {
            ticker: ticker.to_string(),
            bars,
            source: HistorySource::CryptoOhlc,
        })
    }
}
