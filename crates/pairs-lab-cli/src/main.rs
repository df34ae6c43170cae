mod commands;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::backtest::BacktestArgs;
use commands::screening::{PairDetailArgs, PairsArgs, UniverseArgs};
use commands::stats::HalfLifeArgs;

/// Statistical-arbitrage pairs trading lab
#[derive(Parser)]
#[command(
    name = "pairs",
    version,
    about = "Statistical-arbitrage pairs trading backtests",
    long_about = "Backtest a z-score mean-reversion strategy on a pair of co-moving \
                  assets. Estimates an OLS hedge ratio, builds a rolling z-score of \
                  the spread, simulates long/short spread positions and reports \
                  equity, trades and performance metrics."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one pair (defaults to the top screened candidate)
    Backtest(BacktestArgs),
    /// Rank screened candidate pairs with correlation and half-life
    Pairs(PairsArgs),
    /// Summarise the tickers and dates in the price file
    Universe(UniverseArgs),
    /// Chart-ready tail of a default backtest for a pair id like AAPL-MSFT
    PairDetail(PairDetailArgs),
    /// Mean-reversion half-life of a spread series
    HalfLife(HalfLifeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Backtest(args) => commands::backtest::run_backtest(args),
        Commands::Pairs(args) => commands::screening::run_pairs(args),
        Commands::Universe(args) => commands::screening::run_universe(args),
        Commands::PairDetail(args) => commands::screening::run_pair_detail(args),
        Commands::HalfLife(args) => commands::stats::run_half_life(args),
        Commands::Version => {
            println!("pairs {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
