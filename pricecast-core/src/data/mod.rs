//! Bar acquisition: live providers, CSV import, synthetic fallback

pub mod provider;
pub mod pair_map;
pub mod crypto;
pub mod charts;
pub mod csv_source;
pub mod synthetic;
pub mod routed;

pub use provider::{BarProvider, History, HistoryError, HistorySource};
pub use pair_map::PairMap;
pub use crypto::CryptoOhlcProvider;
pub use charts::EquityChartProvider;
pub use csv_source::CsvProvider;
pub use synthetic::synthesize_history;
pub use routed::RoutedProvider;
