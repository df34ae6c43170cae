pub mod config;
pub mod engine;
pub mod metrics;
pub mod signal;

pub use config::{BacktestConfig, Thresholds};
pub use engine::{OpenTrade, Trade};
pub use metrics::PerformanceSummary;

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::data::PriceStore;
use crate::stats::{hedge_ratio, pct_change};
use crate::types::{with_metadata, ComputationOutput, Position, Rate, ZScore};
use crate::{PairsLabError, PairsLabResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Diagnostics for a single date of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRecord {
    pub date: NaiveDate,
    pub equity: f64,
    pub strategy_return: Rate,
    pub position: Position,
    pub spread: Option<f64>,
    pub zscore: Option<ZScore>,
}

/// Summary metrics plus the configuration that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    /// `T1/T2`
    pub pair: String,
    pub ticker1: String,
    pub ticker2: String,
    /// OLS slope of ticker1 on ticker2; `None` if ticker2 never moves
    pub beta: Option<f64>,
    pub lookback: usize,
    pub entry_z: ZScore,
    pub exit_z: ZScore,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_bars: usize,
    pub cumulative_return: Rate,
    pub annualized_return: Option<Rate>,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: Option<Rate>,
    pub num_trades: usize,
    pub win_rate: Option<f64>,
    pub avg_bars_held: Option<f64>,
}

/// Everything one backtest produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutput {
    pub metrics: BacktestMetrics,
    pub bars: Vec<BarRecord>,
    pub trades: Vec<Trade>,
    /// Unrealised position at the final bar, excluded from `trades`
    pub open_position: Option<OpenTrade>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Backtest the z-score mean-reversion rule on one pair.
///
/// Estimates a fixed hedge ratio over the selected window, builds the
/// rolling z-score of the spread, runs the position state machine and
/// summarises the resulting return stream.
pub fn run_backtest(
    prices: &PriceStore,
    config: &BacktestConfig,
) -> PairsLabResult<ComputationOutput<BacktestOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // ------------------------------------------------------------------
    // 1. Validate and slice
    // ------------------------------------------------------------------
    config.validate()?;
    let window = prices.pair_window(
        &config.ticker1,
        &config.ticker2,
        config.start_date,
        config.end_date,
    )?;

    let n = window.len();
    if n < config.min_bars() {
        return Err(PairsLabError::InsufficientData(format!(
            "{} needs at least {} aligned observations (lookback {} + 10), got {}",
            config.pair_label(),
            config.min_bars(),
            config.lookback,
            n
        )));
    }
    let (first_date, last_date) = (window.dates[0], window.dates[n - 1]);
    debug!(
        "backtest {}: {} bars {}..{} lookback={} entry_z={} exit_z={}",
        config.pair_label(),
        n,
        first_date,
        last_date,
        config.lookback,
        config.entry_z,
        config.exit_z
    );

    // ------------------------------------------------------------------
    // 2. Hedge ratio
    // ------------------------------------------------------------------
    let beta = hedge_ratio(&window.price1, &window.price2);
    match beta {
        Some(b) => debug!("backtest {}: beta={:.6}", config.pair_label(), b),
        None => {
            warn!(
                "backtest {}: hedge ratio undefined, {} has zero price variance",
                config.pair_label(),
                config.ticker2
            );
            warnings.push(format!(
                "Hedge ratio undefined: {} price has zero variance over the window; \
                 spread and z-score are undefined and no positions are taken",
                config.ticker2
            ));
        }
    }

    // ------------------------------------------------------------------
    // 3. Spread & z-score
    // ------------------------------------------------------------------
    let signal = signal::build_signal(&window.price1, &window.price2, beta, config.lookback);
    let zero_std_bars = signal
        .rolling_std
        .iter()
        .filter(|sd| **sd == Some(0.0))
        .count();
    if zero_std_bars > 0 {
        warnings.push(format!(
            "{} bar(s) have a zero rolling standard deviation; their z-score is undefined",
            zero_std_bars
        ));
    }

    // ------------------------------------------------------------------
    // 4. Position state machine
    // ------------------------------------------------------------------
    let returns1 = pct_change(&window.price1);
    let returns2 = pct_change(&window.price2);
    let sim = engine::simulate(
        &window.dates,
        &signal.zscore,
        &returns1,
        &returns2,
        beta,
        &config.thresholds(),
    );
    if let Some(open) = &sim.open_trade {
        warn!(
            "backtest {}: {:?} position opened {} still open at final bar",
            config.pair_label(),
            open.direction,
            open.entry_date
        );
        warnings.push(format!(
            "Position opened on {} is still open at the final bar; its unrealised P&L is \
             not in the trade ledger",
            open.entry_date
        ));
    }

    // ------------------------------------------------------------------
    // 5. Metrics
    // ------------------------------------------------------------------
    let equity = metrics::equity_curve(&sim.strategy_returns);
    let summary = metrics::summarize(&sim.strategy_returns, &equity, &sim.trades);

    let bars: Vec<BarRecord> = (0..n)
        .map(|i| BarRecord {
            date: window.dates[i],
            equity: equity[i],
            strategy_return: sim.strategy_returns[i],
            position: sim.positions[i],
            spread: signal.spread[i],
            zscore: signal.zscore[i],
        })
        .collect();

    let metrics = BacktestMetrics {
        pair: config.pair_label(),
        ticker1: config.ticker1.clone(),
        ticker2: config.ticker2.clone(),
        beta,
        lookback: config.lookback,
        entry_z: config.entry_z,
        exit_z: config.exit_z,
        start_date: first_date,
        end_date: last_date,
        num_bars: n,
        cumulative_return: summary.cumulative_return,
        annualized_return: summary.annualized_return,
        sharpe_ratio: summary.sharpe_ratio,
        max_drawdown: summary.max_drawdown,
        num_trades: summary.num_trades,
        win_rate: summary.win_rate,
        avg_bars_held: summary.avg_bars_held,
    };

    info!(
        "backtest {}: {} bars, {} trades, cumulative return {:.4}",
        metrics.pair, n, metrics.num_trades, metrics.cumulative_return
    );

    let output = BacktestOutput {
        metrics,
        bars,
        trades: sim.trades,
        open_position: sim.open_trade,
    };

    let assumptions = json!({
        "config": config,
        "hedge_ratio": "OLS slope of ticker1 on ticker2 over the whole window; intercept discarded",
        "signal": "trailing rolling mean and sample std of the spread over `lookback` bars",
        "entry_bar": "a position opened on a bar earns that bar's return",
        "annualisation_days": 252,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Pairs trading backtest (static OLS hedge ratio, rolling z-score bands)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
