//! Ticker-to-pair mapping for the crypto OHLC source.
//!
//! Exchanges key klines by trading pair (BTCUSDT), while the dashboard talks
//! in bare tickers (BTC). The map is a TOML config with a built-in default,
//! and doubles as the routing table: a ticker the map knows is fetched as
//! crypto, anything else goes to the equity chart source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The complete ticker-to-pair configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairMap {
    pub pairs: BTreeMap<String, String>,
}

impl PairMap {
    /// Load a pair map from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read pair map file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a pair map from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse pair map TOML: {e}"))
    }

    /// Serialize the pair map to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize pair map: {e}"))
    }

    /// The exchange pair for a ticker, if the map knows it.
    pub fn pair_for(&self, ticker: &str) -> Option<&str> {
        self.pairs.get(ticker).map(|s| s.as_str())
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.pairs.contains_key(ticker)
    }

    pub fn ticker_count(&self) -> usize {
        self.pairs.len()
    }

    /// Built-in default covering the majors traded against USDT.
    pub fn default_usdt() -> Self {
        let mut pairs = BTreeMap::new();
        for ticker in [
            "BTC", "ETH", "SOL", "XRP", "ADA", "DOGE", "DOT", "LINK", "AVAX", "LTC",
        ] {
            pairs.insert(ticker.to_string(), format!("{ticker}USDT"));
        }
        Self { pairs }
    }
}
