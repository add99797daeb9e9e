//! CSV file provider.
//!
//! Serves bars from a local CSV file with the header
//! `timestamp,open,high,low,close,volume`. Timestamps are RFC 3339, or bare
//! dates (`2024-01-02`) which map to midnight UTC. Rows are sorted ascending
//! after load so exported files do not have to be.

use super::provider::{BarProvider, History, HistoryError, HistorySource};
use crate::domain::PriceBar;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: Option<f64>,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<f64>,
}

pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, HistoryError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        return Ok(midnight.and_utc());
    }
    Err(HistoryError::MalformedResponse(format!(
        "unparseable timestamp: {raw}"
    )))
}

impl BarProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_file"
    }

    fn fetch(&self, ticker: &str) -> Result<History, HistoryError> {
        log::debug!("{}: reading {}", self.name(), self.path.display());
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(io) => HistoryError::Io(io),
            other => HistoryError::MalformedResponse(format!("{other:?}")),
        })?;

        let mut bars = Vec::new();
        for record in reader.deserialize::<CsvRow>() {
            let row = record.map_err(|e| {
                HistoryError::MalformedResponse(format!("{}: {e}", self.path.display()))
            })?;
            bars.push(PriceBar {
                timestamp: parse_timestamp(&row.timestamp)?,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume.unwrap_or(0.0),
            });
        }

        if bars.is_empty() {
            return Err(HistoryError::EmptyHistory {
                ticker: ticker.to_string(),
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(History {
            ticker: ticker.to_string(),
            bars,
            source: HistorySource::CsvFile,
        })
    }
}
