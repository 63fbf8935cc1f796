//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first value, then EMA[i] = X[i]*k + EMA[i-1]*(1-k).
//! No warmup: every bar of a non-empty series is valid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: Vec::new(),
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = bars
        .iter()
        .zip(ema_values(&closes, period))
        .map(|(bar, ema)| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(ema),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

/// EMA over a raw slice, seeded from its first element.
pub fn ema_values(input: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(input.len());
    let mut ema = 0.0;

    for (i, &x) in input.iter().enumerate() {
        ema = if i == 0 { x } else { x * k + ema * (1.0 - k) };
        out.push(ema);
    }

    out
}
