//! Weekday calendar with an explicit holiday list.

use crate::ports::calendar_port::CalendarPort;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Monday to Friday, minus the configured holidays.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(holidays: I) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

impl CalendarPort for HolidayCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }
}
