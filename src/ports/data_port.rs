//! Price data access port trait.

use crate::domain::error::BreakscanError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` in ascending date order, limited to the
    /// inclusive `[start, end]` range when bounds are given.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, BreakscanError>;

    fn list_symbols(&self) -> Result<Vec<String>, BreakscanError>;
}
