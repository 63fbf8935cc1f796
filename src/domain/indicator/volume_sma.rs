//! Rolling average volume.
//!
//! Unlagged: mean(V[i-n+1..=i]), warmup n-1 bars.
//! Lagged:   mean(V[i-n..i]), warmup n bars. The current bar is excluded so a
//! volume spike cannot inflate the average it is compared against.

use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::{
    undefined_series, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize, lagged: bool) -> IndicatorSeries {
    let indicator_type = IndicatorType::VolumeSma { period, lagged };
    if period == 0 {
        return undefined_series(indicator_type, bars.iter().map(|b| b.date));
    }

    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let means = rolling_mean(&volumes, period, usize::from(lagged));

    IndicatorSeries {
        indicator_type,
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
