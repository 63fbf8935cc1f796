//! Trading calendar port trait.

use chrono::NaiveDate;

pub trait CalendarPort: Send + Sync {
    fn is_trading_day(&self, date: NaiveDate) -> bool;

    /// First trading day strictly after `date`.
    fn next_trading_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut d = date.succ_opt()?;
        while !self.is_trading_day(d) {
            d = d.succ_opt()?;
        }
        Some(d)
    }

    /// Business-day offset: a non-trading `date` first rolls forward to the
    /// next trading day, which counts as the first step. With `days == 0` this
    /// only rolls forward.
    fn advance(&self, date: NaiveDate, days: u32) -> Option<NaiveDate> {
        let mut d = date;
        let mut remaining = days;
        if !self.is_trading_day(d) {
            d = self.next_trading_day(d)?;
            remaining = remaining.saturating_sub(1);
        }
        for _ in 0..remaining {
            d = self.next_trading_day(d)?;
        }
        Some(d)
    }
}
