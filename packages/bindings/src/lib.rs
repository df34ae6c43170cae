use napi::Result as NapiResult;
use napi_derive::napi;

use pairs_lab_core::data::{CandidatePair, PriceStore};
use pairs_lab_core::screening::DEFAULT_DETAIL_TAIL;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Prices arrive as `{ "dates": [...], "series": { "T": [...] } }`; the
/// store validates them on deserialisation.
fn parse_prices(prices_json: &str) -> NapiResult<PriceStore> {
    serde_json::from_str(prices_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Backtest
// ---------------------------------------------------------------------------

#[napi]
pub fn run_backtest(prices_json: String, config_json: String) -> NapiResult<String> {
    let prices = parse_prices(&prices_json)?;
    let config: pairs_lab_core::backtest::BacktestConfig =
        serde_json::from_str(&config_json).map_err(to_napi_error)?;
    let output =
        pairs_lab_core::backtest::run_backtest(&prices, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Screening
// ---------------------------------------------------------------------------

#[napi]
pub fn rank_pairs(prices_json: String, candidates_json: String) -> NapiResult<String> {
    let prices = parse_prices(&prices_json)?;
    let candidates: Vec<CandidatePair> =
        serde_json::from_str(&candidates_json).map_err(to_napi_error)?;
    let output =
        pairs_lab_core::screening::rank_pairs(&prices, &candidates).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn universe_summary(prices_json: String) -> NapiResult<String> {
    let prices = parse_prices(&prices_json)?;
    let output = pairs_lab_core::screening::universe_summary(&prices);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn pair_detail(prices_json: String, pair_id: String, tail: Option<u32>) -> NapiResult<String> {
    let prices = parse_prices(&prices_json)?;
    let tail = tail.map_or(DEFAULT_DETAIL_TAIL, |t| t as usize);
    let output = pairs_lab_core::screening::pair_detail(&prices, &pair_id, tail)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[napi]
pub fn half_life(spread_json: String) -> NapiResult<String> {
    // nulls mark undefined observations and are dropped like NaN
    let raw: Vec<Option<f64>> = serde_json::from_str(&spread_json).map_err(to_napi_error)?;
    let spread: Vec<f64> = raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    let output = pairs_lab_core::stats::estimate_half_life(&spread);
    serde_json::to_string(&output).map_err(to_napi_error)
}
