use chrono::NaiveDate;
use clap::Args;
use log::info;
use serde::Deserialize;
use serde_json::Value;

use pairs_lab_core::backtest::{self, BacktestConfig};
use pairs_lab_core::data::top_candidate;

use crate::input;
use crate::output;

/// Locations of the price table and the screener output
#[derive(Args)]
pub struct DataArgs {
    /// Wide CSV of adjusted closes: date column then one column per ticker
    #[arg(long, default_value = "prices_daily_adj_close.csv")]
    pub prices: String,

    /// Screener output with ticker1,ticker2,pvalue,score
    #[arg(long, default_value = "cointegration_good_pairs.csv")]
    pub candidates: String,
}

/// Arguments for a single pair backtest
#[derive(Args)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// YAML (or .json) parameter file; flags override its values
    #[arg(long)]
    pub config: Option<String>,

    /// Dependent leg; with --ticker2 unset the top candidate is used
    #[arg(long)]
    pub ticker1: Option<String>,

    /// Hedge leg
    #[arg(long)]
    pub ticker2: Option<String>,

    /// Inclusive first date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Inclusive last date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Rolling z-score window in bars
    #[arg(long)]
    pub lookback: Option<usize>,

    /// |z| that opens a position
    #[arg(long, allow_hyphen_values = true)]
    pub entry_z: Option<f64>,

    /// |z| that closes a position
    #[arg(long, allow_hyphen_values = true)]
    pub exit_z: Option<f64>,

    /// Write the equity and trade tables as CSV
    #[arg(long)]
    pub save: bool,

    /// Directory for --save output
    #[arg(long, default_value = ".")]
    pub out_dir: String,
}

/// Parameter file contents; every field optional so flags can fill gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BacktestParams {
    ticker1: Option<String>,
    ticker2: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    lookback: Option<usize>,
    entry_z: Option<f64>,
    exit_z: Option<f64>,
}

impl BacktestParams {
    fn overlay(mut self, args: &BacktestArgs) -> Self {
        if args.ticker1.is_some() {
            self.ticker1 = args.ticker1.clone();
        }
        if args.ticker2.is_some() {
            self.ticker2 = args.ticker2.clone();
        }
        self.start_date = args.start.or(self.start_date);
        self.end_date = args.end.or(self.end_date);
        self.lookback = args.lookback.or(self.lookback);
        self.entry_z = args.entry_z.or(self.entry_z);
        self.exit_z = args.exit_z.or(self.exit_z);
        self
    }

    fn into_config(self, ticker1: String, ticker2: String) -> BacktestConfig {
        let mut config = BacktestConfig::new(ticker1, ticker2);
        config.start_date = self.start_date;
        config.end_date = self.end_date;
        if let Some(lookback) = self.lookback {
            config.lookback = lookback;
        }
        if let Some(entry_z) = self.entry_z {
            config.entry_z = entry_z;
        }
        if let Some(exit_z) = self.exit_z {
            config.exit_z = exit_z;
        }
        config
    }
}

pub fn run_backtest(args: BacktestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = match args.config {
        Some(ref path) => input::file::read_config::<BacktestParams>(path)?,
        None => BacktestParams::default(),
    }
    .overlay(&args);

    let (ticker1, ticker2) = match (params.ticker1.clone(), params.ticker2.clone()) {
        (Some(t1), Some(t2)) => (t1, t2),
        (None, None) => {
            let candidates = input::candidates::load_candidates_csv(&args.data.candidates)?;
            let top = top_candidate(&candidates)
                .ok_or("no tickers given and the candidate file is empty")?;
            info!(
                "no pair given, using top candidate {} (p={})",
                top.pair_id(),
                top.pvalue
            );
            (top.ticker1.clone(), top.ticker2.clone())
        }
        _ => return Err("--ticker1 and --ticker2 must be given together".into()),
    };
    let config = params.into_config(ticker1, ticker2);

    let prices = input::prices::load_price_csv(&args.data.prices)?;
    let result = backtest::run_backtest(&prices, &config)?;

    if args.save {
        let written = output::files::write_backtest_files(&result.result, &args.out_dir)?;
        for path in written {
            info!("wrote {}", path.display());
        }
    }

    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BacktestArgs {
        BacktestArgs {
            data: DataArgs {
                prices: "p.csv".into(),
                candidates: "c.csv".into(),
            },
            config: None,
            ticker1: None,
            ticker2: None,
            start: None,
            end: None,
            lookback: None,
            entry_z: None,
            exit_z: None,
            save: false,
            out_dir: ".".into(),
        }
    }

    #[test]
    fn test_flags_override_file_values() {
        let file: BacktestParams =
            serde_yaml::from_str("ticker1: AAA\nticker2: BBB\nlookback: 30\nentry_z: 1.5").unwrap();
        let mut a = args();
        a.entry_z = Some(2.5);
        a.ticker2 = Some("CCC".into());

        let merged = file.overlay(&a);
        let cfg = merged.into_config("AAA".into(), "CCC".into());
        assert_eq!(cfg.lookback, 30);
        assert_eq!(cfg.entry_z, 2.5);
        assert_eq!(cfg.exit_z, 0.5);
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        let parsed: Result<BacktestParams, _> = serde_yaml::from_str("entry: 1.0");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_half_specified_pair_rejected() {
        let mut a = args();
        a.ticker1 = Some("AAA".into());
        let err = run_backtest(a).unwrap_err();
        assert!(err.to_string().contains("together"));
    }
}
