//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//!
//! A point with `valid == false` is undefined (window not yet filled); its
//! stored value is a placeholder and must never be read as zero.

pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod volume_sma;

pub use ema::{calculate_ema, ema_values};
pub use macd::calculate_macd;
pub use roc::calculate_roc;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use volume_sma::calculate_volume_sma;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
}

impl IndicatorValue {
    /// The headline number: the value itself, or the MACD line.
    pub fn primary(&self) -> f64 {
        match self {
            IndicatorValue::Simple(v) => *v,
            IndicatorValue::Macd { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    /// Rolling mean of volume. `lagged` excludes the current bar.
    VolumeSma { period: usize, lagged: bool },
    Roc(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl IndicatorType {
    /// Column name used in exported series.
    pub fn column_name(&self) -> String {
        match self {
            IndicatorType::Sma(period) => format!("sma{}", period),
            IndicatorType::Ema(period) => format!("ema{}", period),
            IndicatorType::VolumeSma { period, .. } => format!("avgVolume{}", period),
            IndicatorType::Roc(1) => "pctChange".to_string(),
            IndicatorType::Roc(period) => format!("roc{}", period),
            IndicatorType::Rsi(period) => format!("rsi{}", period),
            IndicatorType::Macd { .. } => "macd".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at `index`, or `None` when out of range or undefined.
    pub fn value_at(&self, index: usize) -> Option<&IndicatorValue> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| &p.value)
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.valid).count()
    }
}

/// A series of invalid points aligned with `dates`.
pub(crate) fn undefined_series(
    indicator_type: IndicatorType,
    dates: impl Iterator<Item = NaiveDate>,
) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type,
        values: dates
            .map(|date| IndicatorPoint {
                date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            })
            .collect(),
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::VolumeSma {
                period,
                lagged: false,
            } => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::VolumeSma {
                period,
                lagged: true,
            } => write!(f, "VOLUME_SMA({},LAG1)", period),
            IndicatorType::Roc(period) => write!(f, "ROC({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}
