//! ROC (Rate of Change) indicator.
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! ROC(1) is the bar-over-bar percent change used for price breakouts.
//! If C[i-n] == 0 the point is undefined.
//! Warmup: first n bars invalid.

use crate::domain::indicator::{
    undefined_series, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_roc(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return undefined_series(IndicatorType::Roc(period), bars.iter().map(|b| b.date));
    }

    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let change = if i >= period {
            let prev_close = bars[i - period].close;
            bar.pct_change_from(prev_close)
        } else {
            None
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid: change.is_some(),
            value: IndicatorValue::Simple(change.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Roc(period),
        values,
    }
}
