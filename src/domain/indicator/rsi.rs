//! RSI (Relative Strength Index) indicator.
//!
//! Average gain and loss are plain rolling means over the last n price changes
//! (no Wilder smoothing):
//! - gain[i] = max(C[i] - C[i-1], 0), loss[i] = max(C[i-1] - C[i], 0)
//! - avg_gain[i] = mean(gain[i-n+1..=i]), likewise avg_loss
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI saturates at 100.
//!
//! Warmup: first n bars are invalid (the first bar has no price change).

use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::{
    undefined_series, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 {
        return undefined_series(IndicatorType::Rsi(period), bars.iter().map(|b| b.date));
    }

    let mut gains: Vec<f64> = Vec::with_capacity(bars.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(bars.len() - 1);

    for w in bars.windows(2) {
        let change = w[1].close - w[0].close;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gains = rolling_mean(&gains, period, 0);
    let avg_losses = rolling_mean(&losses, period, 0);

    let mut values = Vec::with_capacity(bars.len());
    values.push(IndicatorPoint {
        date: bars[0].date,
        valid: false,
        value: IndicatorValue::Simple(0.0),
    });

    for (i, bar) in bars.iter().enumerate().skip(1) {
        let rsi = match (avg_gains[i - 1], avg_losses[i - 1]) {
            (Some(avg_gain), Some(avg_loss)) => Some(rsi_from_averages(avg_gain, avg_loss)),
            _ => None,
        };
        values.push(IndicatorPoint {
            date: bar.date,
            valid: rsi.is_some(),
            value: IndicatorValue::Simple(rsi.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
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
    fn rsi_empty_bars() {
        let series = calculate_rsi(&[], 14);
        assert_eq!(series.values.len(), 0);
    }

    #[test]
    fn rsi_single_bar() {
        let bars = make_bars(&[100.0]);
        let series = calculate_rsi(&bars, 14);
        assert_eq!(series.values.len(), 1);
        assert!(!series.values[0].valid);
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (0..16).map(|i| 100.0 + (i % 5) as f64 * 2.0).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        for i in 0..14 {
            assert!(!series.values[i].valid, "Bar {} should be invalid", i);
        }
        assert!(series.values[14].valid);
        assert!(series.values[15].valid);
    }

    #[test]
    fn rsi_all_gains_saturates() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        let rsi = series.value_at(14).unwrap().primary();
        assert!((rsi - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_flat_prices_saturate() {
        let series = calculate_rsi(&make_bars(&[50.0; 20]), 14);
        assert!((series.value_at(19).unwrap().primary() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        let rsi = series.value_at(14).unwrap().primary();
        assert!(rsi.abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_rolling_mean_calculation() {
        // changes: +1, -1, +2
        let series = calculate_rsi(&make_bars(&[10.0, 11.0, 10.0, 12.0]), 2);

        assert!(!series.values[1].valid);
        // gains (1, 0) / losses (0, 1): rs = 1
        assert!((series.value_at(2).unwrap().primary() - 50.0).abs() < 1e-9);
        // gains (0, 2) / losses (1, 0): rs = 2
        let expected = 100.0 - 100.0 / 3.0;
        assert!((series.value_at(3).unwrap().primary() - expected).abs() < 1e-9);
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=30)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        for point in series.values.iter().filter(|p| p.valid) {
            let rsi = point.value.primary();
            assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
        }
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_bars(&[100.0, 101.0]), 0);
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.valid_count(), 0);
    }
}
