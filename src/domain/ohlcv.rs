//! Daily OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// (close - prev_close) / prev_close * 100, undefined when prev_close is 0.
    pub fn pct_change_from(&self, prev_close: f64) -> Option<f64> {
        if prev_close == 0.0 {
            None
        } else {
            Some((self.close - prev_close) / prev_close * 100.0)
        }
    }

    /// Name of the first field that cannot be a real quote: a price that is
    /// not finite or not positive, or a volume that is not finite or negative.
    pub fn invalid_field(&self) -> Option<&'static str> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        if let Some((name, _)) = prices.iter().find(|(_, p)| !p.is_finite() || *p <= 0.0) {
            return Some(*name);
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Some("volume");
        }
        None
    }
}

/// Position and field name of the first bar with an unusable value.
pub fn first_invalid_value(bars: &[OhlcvBar]) -> Option<(usize, &'static str)> {
    bars.iter()
        .enumerate()
        .find_map(|(i, bar)| bar.invalid_field().map(|field| (i, field)))
}

/// Returns the first position where dates stop increasing strictly, if any.
pub fn first_out_of_order(bars: &[OhlcvBar]) -> Option<usize> {
    bars.windows(2)
        .position(|w| w[1].date <= w[0].date)
        .map(|i| i + 1)
}
