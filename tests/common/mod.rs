#![allow(dead_code)]

use breakscan::domain::classifier::ClassifierConfig;
use breakscan::domain::error::BreakscanError;
use breakscan::domain::evaluation::{EvaluationConfig, StrategySpec};
use breakscan::domain::indicator_helpers::{compute_indicators, IndicatorSettings};
pub use breakscan::domain::ohlcv::OhlcvBar;
use breakscan::domain::signal::{BreakoutParams, StrategyKind};
use breakscan::domain::simulator::ExitPolicy;
use breakscan::domain::symbol_data::SymbolData;
use breakscan::ports::calendar_port::CalendarPort;
use breakscan::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, BreakscanError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BreakscanError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| {
                        start.is_none_or(|s| b.date >= s) && end.is_none_or(|e| b.date <= e)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, BreakscanError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Every calendar day trades; lets tests use consecutive-day series.
pub struct EveryDay;

impl CalendarPort for EveryDay {
    fn is_trading_day(&self, _date: NaiveDate) -> bool {
        true
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64, volume: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume,
    }
}

/// One bar per calendar day starting at `start`.
pub fn daily_bars(start: NaiveDate, closes: &[f64], volumes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        })
        .collect()
}

/// Linear price ramp with flat volume.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000.0,
        })
        .collect()
}

/// Twelve daily bars from 2024-01-01 with volume breakouts on
/// 2024-01-05 and 2024-01-08 under a 3-bar window and 50%/2% thresholds.
pub fn breakout_fixture() -> Vec<OhlcvBar> {
    let closes = [
        100.0, 100.0, 100.0, 100.0, 105.0, 106.0, 106.0, 110.0, 111.0, 111.0, 111.0, 111.0,
    ];
    let volumes = [
        1000.0, 1000.0, 1000.0, 1000.0, 3000.0, 1000.0, 1000.0, 4000.0, 1000.0, 1000.0, 1000.0,
        1000.0,
    ];
    daily_bars(date(2024, 1, 1), &closes, &volumes)
}

pub fn small_settings() -> IndicatorSettings {
    IndicatorSettings {
        sma_fast: 2,
        sma_slow: 3,
        volume_window: 3,
        ..IndicatorSettings::default()
    }
}

pub fn symbol_data(symbol: &str, bars: Vec<OhlcvBar>, settings: &IndicatorSettings) -> SymbolData {
    let indicators = compute_indicators(&bars, &settings.required_indicators());
    SymbolData::new(symbol.to_string(), bars).with_indicators(indicators)
}

pub fn strategy(name: &str, signal: StrategyKind, exit_policy: ExitPolicy) -> StrategySpec {
    StrategySpec {
        name: name.to_string(),
        signal,
        exit_policy,
    }
}

pub fn evaluation_config(strategies: Vec<StrategySpec>) -> EvaluationConfig {
    EvaluationConfig {
        indicators: small_settings(),
        breakout: BreakoutParams::default(),
        classifier: ClassifierConfig {
            n_trees: 25,
            ..ClassifierConfig::default()
        },
        strategies,
    }
}
