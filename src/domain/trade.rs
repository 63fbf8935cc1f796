//! Simulated trade records.

use chrono::NaiveDate;
use std::fmt;

/// Which rule closed a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    HoldingPeriod,
    StopLoss,
    TakeProfit,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::HoldingPeriod => "holding_period",
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signal turned into a position.
///
/// The exit fields are all `None` together when the exit bar lies beyond the
/// available data; such a trade stays in the record as open.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub strategy: String,
    pub signal_date: NaiveDate,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    pub return_pct: Option<f64>,
    pub exit_reason: Option<ExitReason>,
    /// Signal-bar volume as a percentage of its rolling average.
    pub volume_ratio_pct: Option<f64>,
    /// Signal-bar close-over-close change.
    pub price_change_pct: Option<f64>,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.return_pct.is_some()
    }

    pub fn holding_days(&self) -> Option<i64> {
        self.exit_date.map(|exit| (exit - self.entry_date).num_days())
    }
}

/// (exit - entry) / entry * 100; undefined for a zero entry price.
pub fn return_pct(entry_price: f64, exit_price: f64) -> Option<f64> {
    if entry_price == 0.0 {
        None
    } else {
        Some((exit_price - entry_price) / entry_price * 100.0)
    }
}
