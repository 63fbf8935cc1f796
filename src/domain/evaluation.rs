//! One evaluation run: indicators, signals, simulated trades and metrics for
//! every configured strategy over a single symbol's series.
//!
//! Each run builds all of its state from scratch and hands it back in an
//! [`EvaluationReport`]; nothing is kept between runs.

use crate::domain::classifier::{train_and_predict, ClassifierConfig, ClassifierOutcome};
use crate::domain::config_validation::validate_evaluation_config;
use crate::domain::error::BreakscanError;
use crate::domain::indicator_helpers::{compute_indicators, IndicatorSettings};
use crate::domain::metrics::StrategyMetrics;
use crate::domain::ohlcv::{first_invalid_value, first_out_of_order, OhlcvBar};
use crate::domain::signal::{
    detect_breakouts, detect_sma_crossovers, BreakoutParams, Signal, StrategyKind,
};
use crate::domain::simulator::{simulate_trades, ExitPolicy};
use crate::domain::symbol_data::SymbolData;
use crate::domain::trade::Trade;
use crate::ports::calendar_port::CalendarPort;
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct StrategySpec {
    pub name: String,
    pub signal: StrategyKind,
    pub exit_policy: ExitPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    pub indicators: IndicatorSettings,
    pub breakout: BreakoutParams,
    pub classifier: ClassifierConfig,
    pub strategies: Vec<StrategySpec>,
}

impl EvaluationConfig {
    pub fn needs_classifier(&self) -> bool {
        self.strategies
            .iter()
            .any(|s| s.signal == StrategyKind::MlPredicted)
    }
}

#[derive(Debug, Clone)]
pub struct StrategyReport {
    pub spec: StrategySpec,
    pub signals: Vec<Signal>,
    pub trades: Vec<Trade>,
    pub metrics: StrategyMetrics,
}

#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub symbol: String,
    pub data: SymbolData,
    pub strategies: Vec<StrategyReport>,
    pub classifier: Option<ClassifierOutcome>,
}

impl EvaluationReport {
    pub fn all_trades(&self) -> impl Iterator<Item = &Trade> {
        self.strategies.iter().flat_map(|s| s.trades.iter())
    }
}

#[derive(Debug, Clone)]
pub enum Evaluation {
    /// The data source returned no bars for the symbol and range.
    NoData { symbol: String },
    Completed(EvaluationReport),
}

pub fn evaluate(
    symbol: &str,
    bars: Vec<OhlcvBar>,
    config: &EvaluationConfig,
    calendar: &dyn CalendarPort,
) -> Result<Evaluation, BreakscanError> {
    validate_evaluation_config(config)?;

    if bars.is_empty() {
        info!(symbol, "empty series, nothing to evaluate");
        return Ok(Evaluation::NoData {
            symbol: symbol.to_string(),
        });
    }
    if let Some(pos) = first_out_of_order(&bars) {
        return Err(BreakscanError::InvalidSeries {
            symbol: symbol.to_string(),
            reason: format!(
                "dates not strictly increasing at bar {} ({})",
                pos, bars[pos].date
            ),
        });
    }

    if let Some((pos, field)) = first_invalid_value(&bars) {
        return Err(BreakscanError::InvalidSeries {
            symbol: symbol.to_string(),
            reason: format!("invalid {} on {} (bar {})", field, bars[pos].date, pos),
        });
    }

    let settings = config.indicators;
    let indicators = compute_indicators(&bars, &settings.required_indicators());
    let data = SymbolData::new(symbol.to_string(), bars).with_indicators(indicators);
    debug!(symbol, bars = data.bar_count(), "indicators computed");

    let classifier = config
        .needs_classifier()
        .then(|| train_and_predict(&data, &settings, &config.breakout, &config.classifier));

    let strategies: Vec<StrategyReport> = config
        .strategies
        .par_iter()
        .map(|spec| {
            let signals = match spec.signal {
                StrategyKind::Breakout => detect_breakouts(&data, &settings, &config.breakout),
                StrategyKind::SmaCrossover => detect_sma_crossovers(&data, &settings),
                StrategyKind::MlPredicted => classifier
                    .as_ref()
                    .map(|c| c.signals.clone())
                    .unwrap_or_default(),
            };
            let trades = simulate_trades(&data, &signals, &spec.name, &spec.exit_policy, calendar);
            let metrics = StrategyMetrics::compute(&spec.name, &trades);
            info!(
                strategy = %spec.name,
                signals = signals.len(),
                trades = trades.len(),
                closed = metrics.closed_trades,
                "strategy evaluated"
            );
            StrategyReport {
                spec: spec.clone(),
                signals,
                trades,
                metrics,
            }
        })
        .collect();

    Ok(Evaluation::Completed(EvaluationReport {
        symbol: symbol.to_string(),
        data,
        strategies,
        classifier,
    }))
}
