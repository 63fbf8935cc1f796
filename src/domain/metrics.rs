//! Per-strategy performance statistics over simulated trades.
//!
//! Only trades with a defined return count. Drawdown is measured on the
//! running sum of per-trade returns in trade order, not on compounded equity.

use crate::domain::trade::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyMetrics {
    pub strategy_name: String,
    pub total_trades: usize,
    pub closed_trades: usize,
    /// Percentage of closed trades with a positive return.
    pub win_rate: f64,
    pub avg_return: f64,
    pub max_drawdown: f64,
    /// Sample standard deviation of returns.
    pub volatility: f64,
    /// Mean return per unit of volatility, per trade (not annualised).
    pub sharpe_ratio: f64,
}

impl StrategyMetrics {
    pub fn compute(strategy_name: &str, trades: &[Trade]) -> Self {
        let returns: Vec<f64> = trades.iter().filter_map(|t| t.return_pct).collect();
        let n = returns.len();

        if n == 0 {
            return StrategyMetrics {
                strategy_name: strategy_name.to_string(),
                total_trades: trades.len(),
                closed_trades: 0,
                win_rate: 0.0,
                avg_return: 0.0,
                max_drawdown: 0.0,
                volatility: 0.0,
                sharpe_ratio: 0.0,
            };
        }

        let wins = returns.iter().filter(|&&r| r > 0.0).count();
        let win_rate = wins as f64 / n as f64 * 100.0;
        let avg_return = returns.iter().sum::<f64>() / n as f64;
        let volatility = sample_stddev(&returns, avg_return);
        let sharpe_ratio = if volatility > 0.0 {
            avg_return / volatility
        } else {
            0.0
        };

        StrategyMetrics {
            strategy_name: strategy_name.to_string(),
            total_trades: trades.len(),
            closed_trades: n,
            win_rate,
            avg_return,
            max_drawdown: cumulative_drawdown(&returns),
            volatility,
            sharpe_ratio,
        }
    }
}

/// Largest drop of the running return sum below its running peak. The peak
/// starts at the first cumulative value.
pub fn cumulative_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 0.0_f64;
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for &r in returns {
        cumulative += r;
        peak = peak.max(cumulative);
        max_dd = max_dd.max(peak - cumulative);
    }

    max_dd
}

fn sample_stddev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
