//! Indicator window settings and batch computation over a bar series.

use crate::domain::indicator::{
    calculate_ema, calculate_macd, calculate_roc, calculate_rsi, calculate_sma,
    calculate_volume_sma, IndicatorSeries, IndicatorType,
};
use crate::domain::ohlcv::OhlcvBar;
use std::collections::HashMap;

/// Window lengths for every indicator the evaluator reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSettings {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub volume_window: usize,
    /// Average volume over the bars strictly before t (no lookahead).
    pub lagged_volume: bool,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_fast: 10,
            sma_slow: 50,
            volume_window: 20,
            lagged_volume: false,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl IndicatorSettings {
    pub fn sma_fast_type(&self) -> IndicatorType {
        IndicatorType::Sma(self.sma_fast)
    }

    pub fn sma_slow_type(&self) -> IndicatorType {
        IndicatorType::Sma(self.sma_slow)
    }

    pub fn volume_type(&self) -> IndicatorType {
        IndicatorType::VolumeSma {
            period: self.volume_window,
            lagged: self.lagged_volume,
        }
    }

    pub fn pct_change_type(&self) -> IndicatorType {
        IndicatorType::Roc(1)
    }

    pub fn rsi_type(&self) -> IndicatorType {
        IndicatorType::Rsi(self.rsi_period)
    }

    pub fn macd_type(&self) -> IndicatorType {
        IndicatorType::Macd {
            fast: self.macd_fast,
            slow: self.macd_slow,
            signal: self.macd_signal,
        }
    }

    /// Every series the signal detectors and the classifier may read.
    pub fn required_indicators(&self) -> Vec<IndicatorType> {
        vec![
            self.sma_fast_type(),
            self.sma_slow_type(),
            self.volume_type(),
            self.pct_change_type(),
            self.rsi_type(),
            self.macd_type(),
        ]
    }
}

pub fn compute_indicator(bars: &[OhlcvBar], indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => calculate_sma(bars, period),
        IndicatorType::Ema(period) => calculate_ema(bars, period),
        IndicatorType::VolumeSma { period, lagged } => calculate_volume_sma(bars, period, lagged),
        IndicatorType::Roc(period) => calculate_roc(bars, period),
        IndicatorType::Rsi(period) => calculate_rsi(bars, period),
        IndicatorType::Macd { fast, slow, signal } => calculate_macd(bars, fast, slow, signal),
    }
}

/// Computes each distinct indicator once.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for &indicator_type in types {
        out.entry(indicator_type)
            .or_insert_with(|| compute_indicator(bars, indicator_type));
    }
    out
}
