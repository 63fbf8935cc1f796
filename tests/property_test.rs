//! Property tests for evaluation invariants.
//!
//! Uses proptest to verify:
//! 1. Fixed holds close exactly `days` after entry, or stay open
//! 2. Stop/target exits respect their thresholds
//! 3. Crossover signals satisfy the cross condition and are ordered
//! 4. Drawdown and win-rate bounds on arbitrary return sets
//! 5. Nearest-bar lookup picks a closest bar

mod common;

use breakscan::domain::metrics::{cumulative_drawdown, StrategyMetrics};
use breakscan::domain::signal::{detect_sma_crossovers, signals_from_dates, StrategyKind};
use breakscan::domain::simulator::{simulate_trades, ExitPolicy};
use breakscan::domain::trade::ExitReason;
use common::*;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((50.0..150.0_f64).prop_map(|p| (p * 100.0).round() / 100.0), 2..max_len)
}

fn arb_returns() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-20.0..20.0_f64, 0..50)
}

fn every_day_data(closes: &[f64]) -> breakscan::domain::symbol_data::SymbolData {
    let volumes = vec![1000.0; closes.len()];
    symbol_data(
        "PROP",
        daily_bars(date(2024, 1, 1), closes, &volumes),
        &small_settings(),
    )
}

fn signal_on_every_bar(
    data: &breakscan::domain::symbol_data::SymbolData,
) -> Vec<breakscan::domain::signal::Signal> {
    let dates: Vec<_> = data.bars.iter().map(|b| b.date).collect();
    signals_from_dates(data, &small_settings(), StrategyKind::Breakout, &dates)
}

// ── 1. Fixed hold ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn fixed_hold_exits_exactly_after_days(closes in arb_closes(40), days in 1u32..10) {
        let data = every_day_data(&closes);
        let signals = signal_on_every_bar(&data);
        let policy = ExitPolicy::FixedHold { days };
        let trades = simulate_trades(&data, &signals, "P", &policy, &EveryDay);

        prop_assert_eq!(trades.len(), closes.len());
        for (i, trade) in trades.iter().enumerate() {
            let in_range = i + (days as usize) < closes.len();
            prop_assert_eq!(trade.is_closed(), in_range);
            if let Some(held) = trade.holding_days() {
                prop_assert_eq!(held, i64::from(days));
            }
        }
    }
}

// ── 2. Stop / take profit ────────────────────────────────────────────

proptest! {
    #[test]
    fn stop_take_exits_respect_thresholds(
        closes in arb_closes(30),
        days in 2u32..8,
        stop in 0.5..10.0_f64,
        take in 0.5..10.0_f64,
    ) {
        let data = every_day_data(&closes);
        let signals = signal_on_every_bar(&data);
        let policy = ExitPolicy::StopTakeProfit {
            days,
            stop_loss_pct: stop,
            take_profit_pct: take,
        };
        let trades = simulate_trades(&data, &signals, "P", &policy, &EveryDay);

        for trade in &trades {
            let (Some(ret), Some(held)) = (trade.return_pct, trade.holding_days()) else {
                continue;
            };
            match trade.exit_reason {
                Some(ExitReason::StopLoss) => {
                    prop_assert!(ret <= -stop);
                    prop_assert!(held < i64::from(days));
                }
                Some(ExitReason::TakeProfit) => {
                    prop_assert!(ret >= take);
                    prop_assert!(held < i64::from(days));
                }
                Some(ExitReason::HoldingPeriod) => prop_assert_eq!(held, i64::from(days)),
                None => prop_assert!(false, "closed trade without exit reason"),
            }
        }
    }
}

// ── 3. Crossovers ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn crossovers_satisfy_cross_condition(closes in arb_closes(60)) {
        let settings = small_settings();
        let data = every_day_data(&closes);
        let signals = detect_sma_crossovers(&data, &settings);

        let fast = settings.sma_fast_type();
        let slow = settings.sma_slow_type();
        for pair in signals.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }
        for s in &signals {
            let t = s.index;
            prop_assert!(t >= 1);
            prop_assert!(data.value(&fast, t).unwrap() > data.value(&slow, t).unwrap());
            prop_assert!(data.value(&fast, t - 1).unwrap() <= data.value(&slow, t - 1).unwrap());
        }
    }
}

// ── 4. Metrics bounds ────────────────────────────────────────────────

proptest! {
    #[test]
    fn drawdown_is_non_negative_and_bounded(returns in arb_returns()) {
        let dd = cumulative_drawdown(&returns);
        let total_loss: f64 = returns.iter().filter(|r| **r < 0.0).map(|r| -r).sum();
        prop_assert!(dd >= 0.0);
        prop_assert!(dd <= total_loss + 1e-9);
    }

    #[test]
    fn win_rate_within_bounds(closes in arb_closes(30), days in 1u32..5) {
        let data = every_day_data(&closes);
        let signals = signal_on_every_bar(&data);
        let policy = ExitPolicy::FixedHold { days };
        let trades = simulate_trades(&data, &signals, "P", &policy, &EveryDay);
        let m = StrategyMetrics::compute("P", &trades);

        prop_assert!((0.0..=100.0).contains(&m.win_rate));
        prop_assert!(m.closed_trades <= m.total_trades);
        prop_assert!(m.volatility >= 0.0);
    }
}

// ── 5. Nearest bar ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn nearest_index_is_closest(
        gaps in prop::collection::vec(1i64..6, 1..20),
        offset in 0i64..60,
    ) {
        let mut day = 0i64;
        let mut bars = Vec::new();
        for gap in &gaps {
            day += gap;
            bars.push(make_bar(
                &(date(2024, 1, 1) + chrono::Duration::days(day)).to_string(),
                100.0,
                1000.0,
            ));
        }
        let data = symbol_data("GAPS", bars, &small_settings());
        let target = date(2024, 1, 1) + chrono::Duration::days(offset);

        match data.nearest_index(target) {
            None => prop_assert!(target > data.last_date().unwrap()),
            Some(i) => {
                let best = (data.bars[i].date - target).num_days().abs();
                for bar in &data.bars {
                    prop_assert!(best <= (bar.date - target).num_days().abs());
                }
            }
        }
    }
}
