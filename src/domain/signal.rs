//! Entry signal detection: volume+price breakouts, SMA crossovers, and
//! externally supplied (classifier) dates.
//!
//! Any bar where a required indicator is still undefined is skipped; it never
//! counts as a zero reading.

use crate::domain::indicator_helpers::IndicatorSettings;
use crate::domain::symbol_data::SymbolData;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Breakout,
    SmaCrossover,
    MlPredicted,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Breakout => "breakout",
            StrategyKind::SmaCrossover => "sma_crossover",
            StrategyKind::MlPredicted => "ml_predicted",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakout" => Ok(StrategyKind::Breakout),
            "sma_crossover" | "crossover" => Ok(StrategyKind::SmaCrossover),
            "ml_predicted" | "ml" => Ok(StrategyKind::MlPredicted),
            other => Err(format!(
                "unknown signal '{}' (expected breakout, sma_crossover or ml_predicted)",
                other
            )),
        }
    }
}

/// An entry opportunity on one bar.
///
/// The volume ratio and price change describe the signal bar itself and are
/// carried through to the trade record.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub date: NaiveDate,
    pub index: usize,
    pub kind: StrategyKind,
    /// Volume as a percentage of its rolling average.
    pub volume_ratio_pct: Option<f64>,
    pub price_change_pct: Option<f64>,
}

/// How the volume threshold scales the rolling average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeThresholdMode {
    /// volume > (1 + pct/100) * average
    Increment,
    /// volume > (pct/100) * average
    Multiple,
}

impl VolumeThresholdMode {
    pub fn multiplier(&self, threshold_pct: f64) -> f64 {
        match self {
            VolumeThresholdMode::Increment => 1.0 + threshold_pct / 100.0,
            VolumeThresholdMode::Multiple => threshold_pct / 100.0,
        }
    }
}

impl FromStr for VolumeThresholdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "increment" => Ok(VolumeThresholdMode::Increment),
            "multiple" => Ok(VolumeThresholdMode::Multiple),
            other => Err(format!(
                "unknown mode '{}' (expected increment or multiple)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakoutParams {
    pub volume_threshold_pct: f64,
    pub price_change_pct: f64,
    pub mode: VolumeThresholdMode,
}

impl Default for BreakoutParams {
    fn default() -> Self {
        Self {
            volume_threshold_pct: 50.0,
            price_change_pct: 2.0,
            mode: VolumeThresholdMode::Increment,
        }
    }
}

/// Whether bar `index` is a volume+price breakout; `None` while the rolling
/// volume average or the percent change is undefined.
pub fn breakout_flag(
    data: &SymbolData,
    settings: &IndicatorSettings,
    params: &BreakoutParams,
    index: usize,
) -> Option<bool> {
    let bar = data.bars.get(index)?;
    let avg_volume = data.value(&settings.volume_type(), index)?;
    let pct_change = data.value(&settings.pct_change_type(), index)?;

    let volume_breakout =
        bar.volume > params.mode.multiplier(params.volume_threshold_pct) * avg_volume;
    let price_breakout = pct_change > params.price_change_pct;
    Some(volume_breakout && price_breakout)
}

pub fn detect_breakouts(
    data: &SymbolData,
    settings: &IndicatorSettings,
    params: &BreakoutParams,
) -> Vec<Signal> {
    (0..data.bar_count())
        .filter(|&i| breakout_flag(data, settings, params, i) == Some(true))
        .map(|i| signal_at(data, settings, StrategyKind::Breakout, i))
        .collect()
}

/// Fast SMA crossing strictly above the slow SMA:
/// `fast[t] > slow[t] && fast[t-1] <= slow[t-1]`, all four values defined.
pub fn detect_sma_crossovers(data: &SymbolData, settings: &IndicatorSettings) -> Vec<Signal> {
    let fast = settings.sma_fast_type();
    let slow = settings.sma_slow_type();

    (1..data.bar_count())
        .filter(|&t| {
            let crossed = || -> Option<bool> {
                let fast_now = data.value(&fast, t)?;
                let slow_now = data.value(&slow, t)?;
                let fast_prev = data.value(&fast, t - 1)?;
                let slow_prev = data.value(&slow, t - 1)?;
                Some(fast_now > slow_now && fast_prev <= slow_prev)
            };
            crossed() == Some(true)
        })
        .map(|t| signal_at(data, settings, StrategyKind::SmaCrossover, t))
        .collect()
}

/// Signals on the given dates. Dates without a bar are ignored; output is in
/// date order with at most one signal per date.
pub fn signals_from_dates(
    data: &SymbolData,
    settings: &IndicatorSettings,
    kind: StrategyKind,
    dates: &[NaiveDate],
) -> Vec<Signal> {
    let indices: BTreeSet<usize> = dates
        .iter()
        .filter_map(|d| data.get_bar_index(*d))
        .collect();
    indices
        .into_iter()
        .map(|i| signal_at(data, settings, kind, i))
        .collect()
}

pub(crate) fn signal_at(
    data: &SymbolData,
    settings: &IndicatorSettings,
    kind: StrategyKind,
    index: usize,
) -> Signal {
    let bar = &data.bars[index];
    let volume_ratio_pct = data
        .value(&settings.volume_type(), index)
        .filter(|avg| *avg != 0.0)
        .map(|avg| bar.volume / avg * 100.0);

    Signal {
        date: bar.date,
        index,
        kind,
        volume_ratio_pct,
        price_change_pct: data.value(&settings.pct_change_type(), index),
    }
}
