use clap::Args;
use serde_json::Value;

use pairs_lab_core::screening::{self, DEFAULT_DETAIL_TAIL};

use super::backtest::DataArgs;
use crate::input;

/// Arguments for ranking screened pairs
#[derive(Args)]
pub struct PairsArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

/// Arguments for the universe summary
#[derive(Args)]
pub struct UniverseArgs {
    /// Wide CSV of adjusted closes
    #[arg(long, default_value = "prices_daily_adj_close.csv")]
    pub prices: String,
}

/// Arguments for the chart view of one pair
#[derive(Args)]
pub struct PairDetailArgs {
    /// Pair id, e.g. AAPL-MSFT
    pub pair_id: String,

    /// Number of most recent bars to keep
    #[arg(long, default_value_t = DEFAULT_DETAIL_TAIL)]
    pub tail: usize,

    /// Wide CSV of adjusted closes
    #[arg(long, default_value = "prices_daily_adj_close.csv")]
    pub prices: String,
}

pub fn run_pairs(args: PairsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let candidates = input::candidates::load_candidates_csv(&args.data.candidates)?;
    let prices = input::prices::load_price_csv(&args.data.prices)?;
    let result = screening::rank_pairs(&prices, &candidates)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_universe(args: UniverseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let prices = input::prices::load_price_csv(&args.prices)?;
    let summary = screening::universe_summary(&prices);
    Ok(serde_json::to_value(summary)?)
}

pub fn run_pair_detail(args: PairDetailArgs) -> Result<Value, Box<dyn std::error::Error>> {
    // reject a malformed id before touching the price file
    screening::parse_pair_id(&args.pair_id)?;
    let prices = input::prices::load_price_csv(&args.prices)?;
    let result = screening::pair_detail(&prices, &args.pair_id, args.tail)?;
    Ok(serde_json::to_value(result)?)
}
