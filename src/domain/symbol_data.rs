//! A symbol's bar series together with its computed indicators.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SymbolData {
    pub symbol: String,
    pub bars: Vec<OhlcvBar>,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
    pub date_index: HashMap<NaiveDate, usize>,
}

impl SymbolData {
    /// `bars` must be in strictly increasing date order.
    pub fn new(symbol: String, bars: Vec<OhlcvBar>) -> Self {
        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();
        Self {
            symbol,
            bars,
            indicators: HashMap::new(),
            date_index,
        }
    }

    pub fn with_indicators(mut self, indicators: HashMap<IndicatorType, IndicatorSeries>) -> Self {
        self.indicators = indicators;
        self
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn get_bar(&self, date: NaiveDate) -> Option<&OhlcvBar> {
        self.date_index.get(&date).map(|&i| &self.bars[i])
    }

    pub fn get_bar_index(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Headline value of an indicator at `index`; `None` while undefined.
    pub fn value(&self, indicator_type: &IndicatorType, index: usize) -> Option<f64> {
        self.indicators
            .get(indicator_type)
            .and_then(|s| s.value_at(index))
            .map(IndicatorValue::primary)
    }

    pub fn macd_signal(&self, indicator_type: &IndicatorType, index: usize) -> Option<f64> {
        match self.indicators.get(indicator_type)?.value_at(index)? {
            IndicatorValue::Macd { signal, .. } => Some(*signal),
            IndicatorValue::Simple(_) => None,
        }
    }

    /// Index of the bar closest in date to `target`.
    ///
    /// Ties go to the later bar. A target after the last bar has no nearest
    /// bar, since that data does not exist yet.
    pub fn nearest_index(&self, target: NaiveDate) -> Option<usize> {
        if let Some(i) = self.get_bar_index(target) {
            return Some(i);
        }
        let last = self.last_date()?;
        if target > last {
            return None;
        }

        let after = self.bars.partition_point(|b| b.date < target);
        if after == 0 {
            return Some(0);
        }
        let before = after - 1;
        let gap_before = (target - self.bars[before].date).num_days();
        let gap_after = (self.bars[after].date - target).num_days();
        if gap_before < gap_after {
            Some(before)
        } else {
            Some(after)
        }
    }
}
