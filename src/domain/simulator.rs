//! Trade lifecycle: resolve an entry for each signal, then an exit under the
//! strategy's exit policy.
//!
//! Entry and exit prices are always bar closes. Missing future data never
//! aborts a run: the trade is kept with empty exit fields, or the signal is
//! dropped when no entry can be placed.

use crate::domain::signal::Signal;
use crate::domain::symbol_data::SymbolData;
use crate::domain::trade::{return_pct, ExitReason, Trade};
use crate::ports::calendar_port::CalendarPort;
use chrono::{Duration, NaiveDate};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitPolicy {
    /// Exit `days` calendar days after entry.
    FixedHold { days: u32 },
    /// Watch closes for up to `days`; exit early on a stop or target hit,
    /// otherwise behave like `FixedHold`.
    StopTakeProfit {
        days: u32,
        stop_loss_pct: f64,
        take_profit_pct: f64,
    },
    /// Enter `wait_days` trading days after the signal and exit `hold_days`
    /// trading days after entry.
    CalendarAware {
        wait_days: u32,
        hold_days: u32,
        /// When the exit date has no bar: snap to the nearest bar instead of
        /// stepping forward one trading day at a time.
        snap_to_nearest: bool,
    },
}

impl fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitPolicy::FixedHold { days } => write!(f, "fixed hold {}d", days),
            ExitPolicy::StopTakeProfit {
                days,
                stop_loss_pct,
                take_profit_pct,
            } => write!(
                f,
                "hold {}d, stop -{}%, take +{}%",
                days, stop_loss_pct, take_profit_pct
            ),
            ExitPolicy::CalendarAware {
                wait_days,
                hold_days,
                snap_to_nearest,
            } => write!(
                f,
                "wait {} / hold {} trading days ({})",
                wait_days,
                hold_days,
                if *snap_to_nearest { "snap" } else { "forward" }
            ),
        }
    }
}

struct Exit {
    index: usize,
    reason: ExitReason,
}

/// One trade per signal that could be entered, in signal order.
pub fn simulate_trades(
    data: &SymbolData,
    signals: &[Signal],
    strategy_name: &str,
    policy: &ExitPolicy,
    calendar: &dyn CalendarPort,
) -> Vec<Trade> {
    signals
        .iter()
        .filter_map(|signal| simulate_one(data, signal, strategy_name, policy, calendar))
        .collect()
}

fn simulate_one(
    data: &SymbolData,
    signal: &Signal,
    strategy_name: &str,
    policy: &ExitPolicy,
    calendar: &dyn CalendarPort,
) -> Option<Trade> {
    let entry_index = resolve_entry(data, signal, policy, calendar)?;
    let entry = &data.bars[entry_index];

    let exit = match *policy {
        ExitPolicy::FixedHold { days } => fixed_hold_exit(data, entry.date, days),
        ExitPolicy::StopTakeProfit {
            days,
            stop_loss_pct,
            take_profit_pct,
        } => scan_stop_take(data, entry.date, entry.close, days, stop_loss_pct, take_profit_pct)
            .or_else(|| fixed_hold_exit(data, entry.date, days)),
        ExitPolicy::CalendarAware {
            hold_days,
            snap_to_nearest,
            ..
        } => calendar_exit(data, entry.date, hold_days, snap_to_nearest, calendar),
    };

    if exit.is_none() {
        debug!(
            strategy = strategy_name,
            signal = %signal.date,
            entry = %entry.date,
            "no exit bar in range, trade left open"
        );
    }

    let exit_bar = exit.as_ref().map(|e| &data.bars[e.index]);
    Some(Trade {
        strategy: strategy_name.to_string(),
        signal_date: signal.date,
        entry_date: entry.date,
        entry_price: entry.close,
        exit_date: exit_bar.map(|b| b.date),
        exit_price: exit_bar.map(|b| b.close),
        return_pct: exit_bar.and_then(|b| return_pct(entry.close, b.close)),
        exit_reason: exit.map(|e| e.reason),
        volume_ratio_pct: signal.volume_ratio_pct,
        price_change_pct: signal.price_change_pct,
    })
}

fn resolve_entry(
    data: &SymbolData,
    signal: &Signal,
    policy: &ExitPolicy,
    calendar: &dyn CalendarPort,
) -> Option<usize> {
    match *policy {
        ExitPolicy::FixedHold { .. } | ExitPolicy::StopTakeProfit { .. } => {
            data.get_bar_index(signal.date)
        }
        ExitPolicy::CalendarAware { wait_days, .. } => {
            let entry_date = calendar.advance(signal.date, wait_days)?;
            match data.get_bar_index(entry_date) {
                Some(index) if index + 1 < data.bar_count() => Some(index),
                _ => {
                    debug!(
                        signal = %signal.date,
                        entry = %entry_date,
                        "entry date outside data range, signal discarded"
                    );
                    None
                }
            }
        }
    }
}

fn fixed_hold_exit(data: &SymbolData, entry_date: NaiveDate, days: u32) -> Option<Exit> {
    let target = entry_date + Duration::days(i64::from(days));
    data.get_bar_index(target).map(|index| Exit {
        index,
        reason: ExitReason::HoldingPeriod,
    })
}

/// Checks each calendar offset 1..days that has a bar. Stop before take.
fn scan_stop_take(
    data: &SymbolData,
    entry_date: NaiveDate,
    entry_price: f64,
    days: u32,
    stop_loss_pct: f64,
    take_profit_pct: f64,
) -> Option<Exit> {
    (1..days).find_map(|offset| {
        let index = data.get_bar_index(entry_date + Duration::days(i64::from(offset)))?;
        let change = return_pct(entry_price, data.bars[index].close)?;
        if change <= -stop_loss_pct {
            Some(Exit {
                index,
                reason: ExitReason::StopLoss,
            })
        } else if change >= take_profit_pct {
            Some(Exit {
                index,
                reason: ExitReason::TakeProfit,
            })
        } else {
            None
        }
    })
}

fn calendar_exit(
    data: &SymbolData,
    entry_date: NaiveDate,
    hold_days: u32,
    snap_to_nearest: bool,
    calendar: &dyn CalendarPort,
) -> Option<Exit> {
    let target = calendar.advance(entry_date, hold_days)?;
    let index = if snap_to_nearest {
        data.nearest_index(target)?
    } else {
        step_forward_to_bar(data, target, calendar)?
    };
    Some(Exit {
        index,
        reason: ExitReason::HoldingPeriod,
    })
}

fn step_forward_to_bar(
    data: &SymbolData,
    start: NaiveDate,
    calendar: &dyn CalendarPort,
) -> Option<usize> {
    let last = data.last_date()?;
    let mut d = start;
    while d <= last {
        if let Some(index) = data.get_bar_index(d) {
            return Some(index);
        }
        d = calendar.next_trading_day(d)?;
    }
    None
}
