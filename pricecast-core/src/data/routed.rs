//! Ticker routing.
//!
//! One provider behind the main entry point: tickers named in the pair map go
//! to the crypto OHLC endpoint, everything else to the equity chart endpoint.

use super::crypto::CryptoOhlcProvider;
use super::charts::EquityChartProvider;
use super::pair_map::PairMap;
use super::provider::{BarProvider, History, HistoryError};

pub struct RoutedProvider {
    crypto: CryptoOhlcProvider,
    equity: EquityChartProvider,
}

impl RoutedProvider {
    /// Build both live providers with the default USDT pair map.
    pub fn new() -> Result<Self, HistoryError> {
        Self::with_pairs(PairMap::default_usdt())
    }

    pub fn with_pairs(pairs: PairMap) -> Result<Self, HistoryError> {
        Ok(Self {
            crypto: CryptoOhlcProvider::new(pairs)?,
            equity: EquityChartProvider::new()?,
        })
    }

    fn route(&self, ticker: &str) -> &dyn BarProvider {
        if self.crypto.serves(ticker) {
            &self.crypto
        } else {
            &self.equity
        }
    }
}

impl BarProvider for RoutedProvider {
    fn name(&self) -> &str {
        "routed"
    }

    fn fetch(&self, ticker: &str) -> Result<History, HistoryError> {
        let provider = self.route(ticker);
        log::debug!("routing {ticker} to {}", provider.name());
        provider.fetch(ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_tickers_go_to_the_exchange() {
        let router = RoutedProvider::new().unwrap();
        assert_eq!(router.route("BTC").name(), "crypto_ohlc");
        assert_eq!(router.route("ETH").name(), "crypto_ohlc");
    }

    #[test]
    fn everything_else_goes_to_equities() {
        let router = RoutedProvider::new().unwrap();
        assert_eq!(router.route("SPY").name(), "equity_chart");
        assert_eq!(router.route("AAPL").name(), "equity_chart");
    }

    #[test]
    fn custom_pair_map_changes_routing() {
        let pairs = PairMap::from_toml("[pairs]\nPEPE = \"PEPEUSDT\"\n").unwrap();
        let router = RoutedProvider::with_pairs(pairs).unwrap();
        assert_eq!(router.route("PEPE").name(), "crypto_ohlc");
        assert_eq!(router.route("BTC").name(), "equity_chart");
    }
}
