//! Bar provider trait and structured error types.
//!
//! The BarProvider trait abstracts over history sources (crypto OHLC, equity
//! charts, CSV import, synthetic) so the analysis layer can swap
//! implementations and mock for tests. Providers make a single attempt under
//! their client timeout; retry and deadline policy belongs to the caller.

use crate::domain::PriceBar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for history fetches.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("ticker not found: {ticker}")]
    TickerNotFound { ticker: String },

    #[error("no usable bars returned for '{ticker}'")]
    EmptyHistory { ticker: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A successfully fetched bar history for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
    pub source: HistorySource,
}

/// Where the history came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistorySource {
    CryptoOhlc,
    EquityChart,
    CsvFile,
    Synthetic,
}

impl HistorySource {
    /// Wire tag, same spelling as the serde form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CryptoOhlc => "CRYPTO_OHLC",
            Self::EquityChart => "EQUITY_CHART",
            Self::CsvFile => "CSV_FILE",
            Self::Synthetic => "SYNTHETIC",
        }
    }
}

/// Trait for bar history providers.
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider, used in logs.
    fn name(&self) -> &str;

    /// Fetch daily bars for a ticker, ascending by timestamp.
    fn fetch(&self, ticker: &str) -> Result<History, HistoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_for_display() {
        let e = HistoryError::RateLimited {
            retry_after_secs: 30,
        };
        assert!(e.to_string().contains("30s"));

        let e = HistoryError::TickerNotFound {
            ticker: "NOPE".into(),
        };
        assert!(e.to_string().contains("NOPE"));
    }

    #[test]
    fn source_serializes_screaming_snake() {
        let json = serde_json::to_string(&HistorySource::CryptoOhlc).unwrap();
        assert_eq!(json, "\"CRYPTO_OHLC\"");
        let json = serde_json::to_string(&HistorySource::Synthetic).unwrap();
        assert_eq!(json, "\"SYNTHETIC\"");
    }
}
