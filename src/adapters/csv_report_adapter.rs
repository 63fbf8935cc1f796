//! CSV report writer: trade log, per-strategy metrics and the per-date
//! indicator/signal series.
//!
//! The series carries one entry flag column per strategy, named after it,
//! followed by one `<name>_exit` flag column per strategy.
//!
//! Prices, percentages and indicator values are rounded to two decimals.
//! Undefined values are written as empty cells.

use crate::domain::error::BreakscanError;
use crate::domain::evaluation::{EvaluationReport, StrategyReport};
use crate::domain::indicator::IndicatorType;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

pub struct CsvReportAdapter;

#[derive(Debug, Serialize)]
struct TradeRow<'a> {
    symbol: &'a str,
    strategy: &'a str,
    signal_date: NaiveDate,
    entry_date: NaiveDate,
    entry_price: f64,
    exit_date: Option<NaiveDate>,
    exit_price: Option<f64>,
    return_pct: Option<f64>,
    /// Running sum of closed returns within the strategy; empty for open trades.
    cumulative_return_pct: Option<f64>,
    exit_reason: Option<&'static str>,
    holding_days: Option<i64>,
    volume_ratio_pct: Option<f64>,
    price_change_pct: Option<f64>,
}

#[derive(Debug, Serialize)]
struct MetricsRow<'a> {
    symbol: &'a str,
    strategy: &'a str,
    signal: &'static str,
    exit_policy: String,
    signals: usize,
    total_trades: usize,
    closed_trades: usize,
    win_rate: f64,
    avg_return: f64,
    max_drawdown: f64,
    volatility: f64,
    sharpe_ratio: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round2_opt(value: Option<f64>) -> Option<f64> {
    value.map(round2)
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

fn flag(dates: &HashSet<NaiveDate>, date: NaiveDate) -> &'static str {
    if dates.contains(&date) { "1" } else { "0" }
}

fn metrics_row<'a>(symbol: &'a str, strategy: &'a StrategyReport) -> MetricsRow<'a> {
    let m = &strategy.metrics;
    MetricsRow {
        symbol,
        strategy: &strategy.spec.name,
        signal: strategy.spec.signal.as_str(),
        exit_policy: strategy.spec.exit_policy.to_string(),
        signals: strategy.signals.len(),
        total_trades: m.total_trades,
        closed_trades: m.closed_trades,
        win_rate: round2(m.win_rate),
        avg_return: round2(m.avg_return),
        max_drawdown: round2(m.max_drawdown),
        volatility: round2(m.volatility),
        sharpe_ratio: round2(m.sharpe_ratio),
    }
}

/// Indicator columns in a stable order; MACD also gets its signal line.
fn series_columns(report: &EvaluationReport) -> Vec<(IndicatorType, String)> {
    let mut types: Vec<IndicatorType> = report.data.indicators.keys().copied().collect();
    types.sort_by_key(|t| t.column_name());

    let mut columns = Vec::new();
    for t in types {
        columns.push((t, t.column_name()));
        if matches!(t, IndicatorType::Macd { .. }) {
            columns.push((t, "macdSignal".to_string()));
        }
    }
    columns
}

impl ReportPort for CsvReportAdapter {
    fn write_trades(
        &self,
        report: &EvaluationReport,
        output_path: &str,
    ) -> Result<(), BreakscanError> {
        let mut wtr = csv::Writer::from_path(output_path)?;
        let mut count = 0usize;
        for strategy in &report.strategies {
            let mut cumulative = 0.0;
            for trade in &strategy.trades {
                let cumulative_return_pct = trade.return_pct.map(|r| {
                    cumulative += r;
                    cumulative
                });
                wtr.serialize(TradeRow {
                    symbol: &report.symbol,
                    strategy: &trade.strategy,
                    signal_date: trade.signal_date,
                    entry_date: trade.entry_date,
                    entry_price: round2(trade.entry_price),
                    exit_date: trade.exit_date,
                    exit_price: round2_opt(trade.exit_price),
                    return_pct: round2_opt(trade.return_pct),
                    cumulative_return_pct: round2_opt(cumulative_return_pct),
                    exit_reason: trade.exit_reason.map(|r| r.as_str()),
                    holding_days: trade.holding_days(),
                    volume_ratio_pct: round2_opt(trade.volume_ratio_pct),
                    price_change_pct: round2_opt(trade.price_change_pct),
                })?;
                count += 1;
            }
        }
        wtr.flush()?;
        info!(path = output_path, trades = count, "trade log written");
        Ok(())
    }

    fn write_metrics(
        &self,
        report: &EvaluationReport,
        output_path: &str,
    ) -> Result<(), BreakscanError> {
        let mut wtr = csv::Writer::from_path(output_path)?;
        for strategy in &report.strategies {
            wtr.serialize(metrics_row(&report.symbol, strategy))?;
        }
        wtr.flush()?;
        info!(path = output_path, strategies = report.strategies.len(), "metrics written");
        Ok(())
    }

    fn write_series(
        &self,
        report: &EvaluationReport,
        output_path: &str,
    ) -> Result<(), BreakscanError> {
        let data = &report.data;
        let columns = series_columns(report);
        let signal_dates: Vec<HashSet<NaiveDate>> = report
            .strategies
            .iter()
            .map(|s| s.signals.iter().map(|sig| sig.date).collect())
            .collect();
        let exit_dates: Vec<HashSet<NaiveDate>> = report
            .strategies
            .iter()
            .map(|s| s.trades.iter().filter_map(|t| t.exit_date).collect())
            .collect();

        let mut wtr = csv::Writer::from_path(output_path)?;

        let mut header: Vec<String> = ["date", "open", "high", "low", "close", "volume"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend(columns.iter().map(|(_, name)| name.clone()));
        header.extend(report.strategies.iter().map(|s| s.spec.name.clone()));
        header.extend(report.strategies.iter().map(|s| format!("{}_exit", s.spec.name)));
        wtr.write_record(&header)?;

        for (i, bar) in data.bars.iter().enumerate() {
            let mut record = vec![
                bar.date.to_string(),
                format!("{:.2}", bar.open),
                format!("{:.2}", bar.high),
                format!("{:.2}", bar.low),
                format!("{:.2}", bar.close),
                format!("{}", bar.volume),
            ];
            for (t, name) in &columns {
                let value = if name == "macdSignal" {
                    data.macd_signal(t, i)
                } else {
                    data.value(t, i)
                };
                record.push(cell(value));
            }
            for dates in signal_dates.iter().chain(&exit_dates) {
                record.push(flag(dates, bar.date).to_string());
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        info!(path = output_path, rows = data.bar_count(), "series written");
        Ok(())
    }
}
