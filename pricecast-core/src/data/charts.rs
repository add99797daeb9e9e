//! Equity chart provider.
//!
//! Fetches daily OHLCV bars from a Yahoo-style v8 chart API. The endpoint has
//! no official contract and changes without notice; parse failures surface as
//! [`HistoryError::MalformedResponse`] and the caller decides whether to fall
//! back. One attempt per call, 30s client timeout.

use super::provider::{BarProvider, History, HistoryError, HistorySource};
use crate::domain::PriceBar;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

pub struct EquityChartProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    lookback_days: i64,
}

impl EquityChartProvider {
    pub fn new() -> Result<Self, HistoryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| HistoryError::NetworkUnreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        })
    }

    /// Point the provider at a different host (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chart_url(&self, ticker: &str) -> String {
        let end = Utc::now();
        let start = end - ChronoDuration::days(self.lookback_days);
        format!(
            "{}/v8/finance/chart/{ticker}?period1={}&period2={}&interval=1d",
            self.base_url,
            start.timestamp(),
            end.timestamp()
        )
    }

    /// Parse the chart API response into bars.
    fn parse_response(ticker: &str, resp: ChartResponse) -> Result<Vec<PriceBar>, HistoryError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    HistoryError::TickerNotFound {
                        ticker: ticker.to_string(),
                    }
                } else {
                    HistoryError::MalformedResponse(format!("{}: {}", err.code, err.description))
                }
            } else {
                HistoryError::MalformedResponse("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| HistoryError::MalformedResponse("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| HistoryError::MalformedResponse("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| HistoryError::MalformedResponse("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                HistoryError::MalformedResponse(format!("invalid timestamp: {ts}"))
            })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Holidays and half-days come through as all-None rows; a row
            // missing any of high/low/close cannot feed the indicators.
            let (Some(high), Some(low), Some(close)) = (high, low, close) else {
                continue;
            };

            bars.push(PriceBar {
                timestamp,
                open,
                high,
                low,
                close,
                volume: volume.unwrap_or(0) as f64,
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

impl BarProvider for EquityChartProvider {
    fn name(&self) -> &str {
        "equity_chart"
    }

    fn fetch(&self, ticker: &str) -> Result<History, HistoryError> {
        let url = self.chart_url(ticker);
        log::debug!("{}: GET {url}", self.name());

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| HistoryError::NetworkUnreachable(e.to_string()))?;

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
        if !status.is_success() {
            return Err(HistoryError::MalformedResponse(format!(
                "unexpected HTTP status {status} for {ticker}"
            )));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            HistoryError::MalformedResponse(format!("parse chart for {ticker}: {e}"))
        })?;

        let bars = Self::parse_response(ticker, chart)?;
        Ok(History {
            ticker: ticker.to_string(),
            bars,
            source: HistorySource::EquityChart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": {
                        "quote": [{
                            "open":   [100.0, null, 102.0],
                            "high":   [105.0, null, 106.0],
                            "low":    [99.0,  null, 101.0],
                            "close":  [103.0, null, 104.5],
                            "volume": [50000, null, 61000]
                        }]
                    }
                }],
                "error": null
            }
        }"#
    }

    #[test]
    fn parses_and_skips_null_rows() {
        let resp: ChartResponse = serde_json::from_str(sample_json()).unwrap();
        let bars = EquityChartProvider::parse_response("SPY", resp).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 103.0);
        assert_eq!(bars[0].open, Some(100.0));
        assert_eq!(bars[1].close, 104.5);
        assert_eq!(bars[1].volume, 61000.0);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn not_found_error_maps_to_ticker_not_found() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found" }
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = EquityChartProvider::parse_response("NOPE", resp).unwrap_err();
        assert!(matches!(err, HistoryError::TickerNotFound { .. }));
    }

    #[test]
    fn other_error_maps_to_malformed() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Bad Request", "description": "bad range" }
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = EquityChartProvider::parse_response("SPY", resp).unwrap_err();
        assert!(matches!(err, HistoryError::MalformedResponse(_)));
    }

    #[test]
    fn all_null_rows_is_empty_history() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600],
                    "indicators": {
                        "quote": [{
                            "open": [null], "high": [null], "low": [null],
                            "close": [null], "volume": [null]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = EquityChartProvider::parse_response("SPY", resp).unwrap_err();
        assert!(matches!(err, HistoryError::EmptyHistory { .. }));
    }

    #[test]
    fn url_carries_ticker_and_interval() {
        let provider = EquityChartProvider::new()
            .unwrap()
            .with_base_url("http://localhost:9");
        let url = provider.chart_url("SPY");
        assert!(url.starts_with("http://localhost:9/v8/finance/chart/SPY"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("period1="));
    }
}
