//! CSV file price data adapter.
//!
//! One file per symbol, `<SYMBOL>.csv`, with a header row naming at least
//! Date, Open, High, Low, Close and Volume (any case, any order). Extra
//! columns such as `Adj Close` are ignored.

use crate::domain::error::BreakscanError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn source_error(reason: String) -> BreakscanError {
    BreakscanError::DataSource { reason }
}

/// Positions of the required columns, in `COLUMNS` order.
fn column_positions(headers: &csv::StringRecord) -> Result<[usize; 6], BreakscanError> {
    let mut positions = [0usize; 6];
    for (slot, name) in positions.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| source_error(format!("missing {} column", name)))?;
    }
    Ok(positions)
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
}

fn parse_field(
    record: &csv::StringRecord,
    pos: usize,
    name: &str,
    line: u64,
) -> Result<f64, BreakscanError> {
    let raw = record
        .get(pos)
        .ok_or_else(|| source_error(format!("line {}: missing {} value", line, name)))?;
    raw.trim().parse().map_err(|e| {
        source_error(format!(
            "line {}: invalid {} value '{}': {}",
            line, name, raw, e
        ))
    })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, BreakscanError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| source_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let [date_col, open_col, high_col, low_col, close_col, volume_col] =
            column_positions(rdr.headers()?)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let raw_date = record.get(date_col).unwrap_or_default();
            let date = parse_date(raw_date).ok_or_else(|| {
                source_error(format!("line {}: invalid date '{}'", line, raw_date))
            })?;

            if start.is_some_and(|s| date < s) || end.is_some_and(|e| date > e) {
                continue;
            }

            bars.push(OhlcvBar {
                date,
                open: parse_field(&record, open_col, "open", line)?,
                high: parse_field(&record, high_col, "high", line)?,
                low: parse_field(&record, low_col, "low", line)?,
                close: parse_field(&record, close_col, "close", line)?,
                volume: parse_field(&record, volume_col, "volume", line)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded price file");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BreakscanError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            source_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| source_error(format!("directory entry error: {}", e)))?;
            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                symbols.push(stem.to_string_lossy().into_owned());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
