use serde::{Deserialize, Serialize};

use super::engine::Trade;
use crate::stats::{mean, sample_std};
use crate::types::{Rate, ANNUAL_TRADING_DAYS};

/// Summary statistics of one run. `None` marks an undefined value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub cumulative_return: Rate,
    pub annualized_return: Option<Rate>,
    pub sharpe_ratio: Option<f64>,
    /// Most negative `equity / running_peak - 1`; always <= 0
    pub max_drawdown: Option<Rate>,
    pub num_trades: usize,
    pub win_rate: Option<f64>,
    pub avg_bars_held: Option<f64>,
    /// Finite daily returns the statistics were computed over
    pub valid_return_days: usize,
}

/// Compounded equity starting from 1.0; undefined returns count as flat.
pub fn equity_curve(returns: &[Rate]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0_f64, |equity, r| {
            let r = if r.is_finite() { *r } else { 0.0 };
            *equity *= 1.0 + r;
            Some(*equity)
        })
        .collect()
}

/// Annualised Sharpe ratio: `sqrt(252) * mean / sample_std`.
///
/// Undefined for fewer than two returns or a zero standard deviation.
pub fn sharpe_ratio(returns: &[Rate]) -> Option<f64> {
    let sd = sample_std(returns)?;
    if sd == 0.0 {
        return None;
    }
    let m = mean(returns)?;
    let sharpe = ANNUAL_TRADING_DAYS.sqrt() * m / sd;
    sharpe.is_finite().then_some(sharpe)
}

/// Maximum drawdown of an equity curve as a non-positive fraction.
pub fn max_drawdown(equity: &[f64]) -> Option<Rate> {
    if equity.is_empty() {
        return None;
    }
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &e in equity {
        peak = peak.max(e);
        let dd = e / peak - 1.0;
        if dd.is_finite() {
            worst = worst.min(dd);
        }
    }
    Some(worst)
}

/// Win rate and average holding period; both undefined with no trades.
pub fn trade_statistics(trades: &[Trade]) -> (Option<f64>, Option<f64>) {
    if trades.is_empty() {
        return (None, None);
    }
    let n = trades.len() as f64;
    let wins = trades.iter().filter(|t| t.return_pct > 0.0).count() as f64;
    let bars = trades.iter().map(|t| t.bars_held as f64).sum::<f64>();
    (Some(wins / n), Some(bars / n))
}

/// Derive the run summary from its return series, equity curve and ledger.
pub fn summarize(returns: &[Rate], equity: &[f64], trades: &[Trade]) -> PerformanceSummary {
    let valid: Vec<Rate> = returns.iter().copied().filter(|r| r.is_finite()).collect();
    let (win_rate, avg_bars_held) = trade_statistics(trades);

    if valid.len() < 2 {
        return PerformanceSummary {
            cumulative_return: 0.0,
            annualized_return: None,
            sharpe_ratio: None,
            max_drawdown: None,
            num_trades: trades.len(),
            win_rate,
            avg_bars_held,
            valid_return_days: valid.len(),
        };
    }

    let cumulative_return = equity.last().map_or(0.0, |e| e - 1.0);
    let annualized_return = {
        let ann = (1.0 + cumulative_return).powf(ANNUAL_TRADING_DAYS / valid.len() as f64) - 1.0;
        ann.is_finite().then_some(ann)
    };

    PerformanceSummary {
        cumulative_return,
        annualized_return,
        sharpe_ratio: sharpe_ratio(&valid),
        max_drawdown: max_drawdown(equity),
        num_trades: trades.len(),
        win_rate,
        avg_bars_held,
        valid_return_days: valid.len(),
    }
}
