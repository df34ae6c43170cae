use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::data::{CandidatePair, PriceStore};
use crate::stats::{half_life, pct_change, pearson_correlation};
use crate::types::{with_metadata, ComputationOutput, Price};
use crate::PairsLabResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Strength bucket from the screener p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairStatus {
    Strong,
    Moderate,
}

/// Descriptive labels shown next to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairTag {
    #[serde(rename = "Highly Correlated")]
    HighlyCorrelated,
    #[serde(rename = "Fast Reversion")]
    FastReversion,
    #[serde(rename = "Slow Reversion")]
    SlowReversion,
}

/// A screener candidate enriched with correlation and mean-reversion speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPair {
    /// `T1-T2`
    pub id: String,
    pub ticker1: String,
    pub ticker2: String,
    pub pvalue: f64,
    pub score: f64,
    /// Correlation of daily simple returns
    pub correlation: Option<f64>,
    /// Half-life in bars of the raw price difference
    pub half_life: Option<f64>,
    pub status: PairStatus,
    pub tags: Vec<PairTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRanking {
    pub pairs: Vec<RankedPair>,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const STRONG_PVALUE: f64 = 0.02;
const HIGH_CORRELATION: f64 = 0.9;
const FAST_REVERSION_BARS: f64 = 20.0;
const SLOW_REVERSION_BARS: f64 = 60.0;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rank screener candidates for display, lowest p-value first.
///
/// Candidates referring to tickers absent from `prices` are skipped with a
/// warning rather than failing the whole ranking.
pub fn rank_pairs(
    prices: &PriceStore,
    candidates: &[CandidatePair],
) -> PairsLabResult<ComputationOutput<PairRanking>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut pairs: Vec<RankedPair> = Vec::with_capacity(candidates.len());

    for cand in candidates {
        let (Ok(p1), Ok(p2)) = (prices.series(&cand.ticker1), prices.series(&cand.ticker2)) else {
            warnings.push(format!(
                "Skipped {}: ticker not in price data",
                cand.pair_id()
            ));
            continue;
        };
        pairs.push(rank_candidate(cand, p1, p2));
    }

    pairs.sort_by(|a, b| a.pvalue.total_cmp(&b.pvalue));
    debug!("ranked {} of {} candidate pairs", pairs.len(), candidates.len());

    let assumptions = serde_json::json!({
        "strong_pvalue_below": STRONG_PVALUE,
        "highly_correlated_above": HIGH_CORRELATION,
        "fast_reversion_below_bars": FAST_REVERSION_BARS,
        "slow_reversion_below_bars": SLOW_REVERSION_BARS,
        "half_life_spread": "ticker1 - ticker2 (unhedged)",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cointegration candidate ranking with return correlation and AR(1) half-life",
        &assumptions,
        warnings,
        elapsed,
        PairRanking { pairs },
    ))
}

/// Correlation of two price series' daily returns over the days where both
/// returns are defined.
pub fn return_correlation(price1: &[Price], price2: &[Price]) -> Option<f64> {
    let (r1, r2): (Vec<f64>, Vec<f64>) = pct_change(price1)
        .into_iter()
        .zip(pct_change(price2))
        .filter_map(|(a, b)| Some((a?, b?)))
        .unzip();
    pearson_correlation(&r1, &r2)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn rank_candidate(cand: &CandidatePair, p1: &[Price], p2: &[Price]) -> RankedPair {
    let correlation = return_correlation(p1, p2);
    let spread: Vec<f64> = p1.iter().zip(p2).map(|(a, b)| a - b).collect();
    let hl = half_life(&spread);

    let status = if cand.pvalue < STRONG_PVALUE {
        PairStatus::Strong
    } else {
        PairStatus::Moderate
    };

    RankedPair {
        id: cand.pair_id(),
        ticker1: cand.ticker1.clone(),
        ticker2: cand.ticker2.clone(),
        pvalue: cand.pvalue,
        score: cand.score,
        correlation,
        half_life: hl,
        status,
        tags: tags_for(correlation, hl),
    }
}

fn tags_for(correlation: Option<f64>, half_life: Option<f64>) -> Vec<PairTag> {
    let mut tags = Vec::new();
    if correlation.is_some_and(|c| c.abs() > HIGH_CORRELATION) {
        tags.push(PairTag::HighlyCorrelated);
    }
    match half_life {
        Some(hl) if hl < FAST_REVERSION_BARS => tags.push(PairTag::FastReversion),
        Some(hl) if hl < SLOW_REVERSION_BARS => tags.push(PairTag::SlowReversion),
        _ => {}
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(
            tags_for(Some(0.95), Some(5.0)),
            vec![PairTag::HighlyCorrelated, PairTag::FastReversion]
        );
        assert_eq!(tags_for(Some(-0.92), Some(45.0)), vec![
            PairTag::HighlyCorrelated,
            PairTag::SlowReversion
        ]);
        assert_eq!(tags_for(Some(0.5), Some(80.0)), vec![]);
        assert_eq!(tags_for(None, None), vec![]);
    }

    #[test]
    fn test_tag_serialisation_is_human_readable() {
        let json = serde_json::to_string(&PairTag::FastReversion).unwrap();
        assert_eq!(json, "\"Fast Reversion\"");
    }

    #[test]
    fn test_return_correlation_identical_moves() {
        let p1 = [100.0, 101.0, 99.0, 102.0, 103.0];
        let p2: Vec<f64> = p1.iter().map(|p| p * 3.0).collect();
        let c = return_correlation(&p1, &p2).unwrap();
        assert!((c - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_return_correlation_too_short() {
        assert_eq!(return_correlation(&[1.0, 2.0], &[1.0, 3.0]), None);
    }
}
