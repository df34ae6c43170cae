use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::backtest::{run_backtest, BacktestConfig, BacktestMetrics};
use crate::data::PriceStore;
use crate::types::{with_metadata, ComputationOutput, ZScore};
use crate::{PairsLabError, PairsLabResult};

pub const DEFAULT_DETAIL_TAIL: usize = 500;

/// Chart-ready view of a pair: the tail of its backtest series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDetail {
    pub pair: String,
    pub beta: Option<f64>,
    pub times: Vec<NaiveDate>,
    pub spread: Vec<Option<f64>>,
    pub zscore: Vec<Option<ZScore>>,
    pub equity: Vec<f64>,
    pub metrics: BacktestMetrics,
}

/// Split `T1-T2` into its two tickers.
pub fn parse_pair_id(pair_id: &str) -> PairsLabResult<(String, String)> {
    let mut parts = pair_id.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(t1), Some(t2), None) if !t1.is_empty() && !t2.is_empty() => {
            Ok((t1.to_string(), t2.to_string()))
        }
        _ => Err(PairsLabError::InvalidInput {
            field: "pair_id".into(),
            reason: format!("pair_id must be like 'AAPL-MSFT', got '{}'", pair_id),
        }),
    }
}

/// Backtest `pair_id` with default parameters over the whole calendar and
/// keep the last `tail` bars.
pub fn pair_detail(
    prices: &PriceStore,
    pair_id: &str,
    tail: usize,
) -> PairsLabResult<ComputationOutput<PairDetail>> {
    let (t1, t2) = parse_pair_id(pair_id)?;
    let run = run_backtest(prices, &BacktestConfig::new(t1, t2))?;

    let out = run.result;
    let skip = out.bars.len().saturating_sub(tail);
    let bars = &out.bars[skip..];

    let detail = PairDetail {
        pair: out.metrics.pair.clone(),
        beta: out.metrics.beta,
        times: bars.iter().map(|b| b.date).collect(),
        spread: bars.iter().map(|b| b.spread).collect(),
        zscore: bars.iter().map(|b| b.zscore).collect(),
        equity: bars.iter().map(|b| b.equity).collect(),
        metrics: out.metrics,
    };

    Ok(with_metadata(
        &run.methodology,
        &run.assumptions,
        run.warnings,
        run.metadata.computation_time_us,
        detail,
    ))
}
