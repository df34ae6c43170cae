use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use pairs_lab_core::backtest::{BacktestOutput, Trade};
use pairs_lab_core::Direction;

#[derive(Serialize)]
struct EquityRow {
    date: String,
    equity: f64,
    strategy_return: f64,
    position: i8,
    spread: Option<f64>,
    zscore: Option<f64>,
}

#[derive(Serialize)]
struct TradeRow<'a> {
    direction: &'a str,
    entry_date: String,
    exit_date: String,
    entry_z: f64,
    exit_z: f64,
    pnl: f64,
    return_pct: f64,
    bars_held: usize,
}

impl<'a> From<&'a Trade> for TradeRow<'a> {
    fn from(t: &'a Trade) -> Self {
        TradeRow {
            direction: match t.direction {
                Direction::LongSpread => "long_spread",
                Direction::ShortSpread => "short_spread",
            },
            entry_date: t.entry_date.to_string(),
            exit_date: t.exit_date.to_string(),
            entry_z: t.entry_z,
            exit_z: t.exit_z,
            pnl: t.pnl,
            return_pct: t.return_pct,
            bars_held: t.bars_held,
        }
    }
}

/// Write `backtest_<T1>_<T2>_equity.csv` and `backtest_<T1>_<T2>_trades.csv`
/// into `out_dir`, creating it if needed. Returns the written paths.
pub fn write_backtest_files(
    output: &BacktestOutput,
    out_dir: &str,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let dir = Path::new(out_dir);
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create '{}': {}", dir.display(), e))?;

    let stem = format!(
        "backtest_{}_{}",
        output.metrics.ticker1, output.metrics.ticker2
    );
    let equity_path = dir.join(format!("{}_equity.csv", stem));
    let trades_path = dir.join(format!("{}_trades.csv", stem));

    let mut wtr = csv::Writer::from_path(&equity_path)?;
    for bar in &output.bars {
        wtr.serialize(EquityRow {
            date: bar.date.to_string(),
            equity: bar.equity,
            strategy_return: bar.strategy_return,
            position: bar.position.units(),
            spread: bar.spread,
            zscore: bar.zscore,
        })?;
    }
    wtr.flush()?;

    let mut wtr = csv::Writer::from_path(&trades_path)?;
    if output.trades.is_empty() {
        // serialize() emits headers lazily; keep the file self-describing
        wtr.write_record([
            "direction",
            "entry_date",
            "exit_date",
            "entry_z",
            "exit_z",
            "pnl",
            "return_pct",
            "bars_held",
        ])?;
    }
    for trade in &output.trades {
        wtr.serialize(TradeRow::from(trade))?;
    }
    wtr.flush()?;

    Ok(vec![equity_path, trades_path])
}
