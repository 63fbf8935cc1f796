//! Simple Moving Average of closing prices.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{
    undefined_series, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return undefined_series(IndicatorType::Sma(period), bars.iter().map(|b| b.date));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let means = rolling_mean(&closes, period, 0);

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values: bars
            .iter()
            .zip(means)
            .map(|(bar, mean)| IndicatorPoint {
                date: bar.date,
                valid: mean.is_some(),
                value: IndicatorValue::Simple(mean.unwrap_or(0.0)),
            })
            .collect(),
    }
}

/// Rolling mean over `period` values ending `lag` positions before each index.
///
/// With `lag == 0` the window is `values[i-n+1..=i]`; with `lag == 1` it is
/// `values[i-n..i]`. Positions whose window does not fit are `None`.
pub(crate) fn rolling_mean(values: &[f64], period: usize, lag: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= period {
            sum -= values[i - period];
        }
        let target = i + lag;
        if i + 1 >= period && target < values.len() {
            out[target] = Some(sum / period as f64);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_sma(&bars, 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
    }

    #[test]
    fn sma_values() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_sma(&bars, 3);

        assert!((series.value_at(2).unwrap().primary() - 20.0).abs() < 1e-12);
        assert!((series.value_at(3).unwrap().primary() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn sma_shorter_than_window_is_all_invalid() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 50);
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn sma_zero_period() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 0);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn rolling_mean_lagged_excludes_current() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let lagged = rolling_mean(&values, 2, 1);
        assert_eq!(lagged, vec![None, None, Some(1.5), Some(2.5), Some(3.5)]);

        let plain = rolling_mean(&values, 2, 0);
        assert_eq!(plain, vec![None, Some(1.5), Some(2.5), Some(3.5), Some(4.5)]);
    }

    #[test]
    fn sma_indicator_type() {
        let bars = make_bars(&[1.0]);
        assert_eq!(calculate_sma(&bars, 10).indicator_type, IndicatorType::Sma(10));
    }
}
