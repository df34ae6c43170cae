use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::config::Thresholds;
use crate::types::{Direction, Position, Rate, ZScore};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A closed round trip on the spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub direction: Direction,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    /// Bar index of the entry within the run's calendar
    pub entry_index: usize,
    /// Bar index of the exit within the run's calendar
    pub exit_index: usize,
    pub entry_z: ZScore,
    pub exit_z: ZScore,
    /// Sum of daily strategy returns from entry bar to exit bar inclusive
    pub pnl: Rate,
    /// Same as `pnl`; returns are already fractional
    pub return_pct: Rate,
    pub bars_held: usize,
}

/// Bookkeeping for the position currently on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenTrade {
    pub direction: Direction,
    pub entry_index: usize,
    pub entry_date: NaiveDate,
    pub entry_z: ZScore,
}

/// Effect of one bar's z-score on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Hold,
    Enter(Direction),
    Exit,
}

/// Per-bar output of the scan plus the closed-trade ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub positions: Vec<Position>,
    pub strategy_returns: Vec<Rate>,
    pub trades: Vec<Trade>,
    /// Position still on after the final bar; never added to `trades`
    pub open_trade: Option<OpenTrade>,
}

// ---------------------------------------------------------------------------
// Transition rules
// ---------------------------------------------------------------------------

/// Decide what happens on a bar given the position carried into it.
///
/// Entries need a strict breach of the entry band, exits a strict move
/// inside the exit band. An undefined z-score never changes anything.
pub fn next_transition(position: Position, z: Option<ZScore>, thresholds: &Thresholds) -> Transition {
    let Some(z) = z else {
        return Transition::Hold;
    };
    if position.is_flat() {
        if z > thresholds.entry_z {
            Transition::Enter(Direction::ShortSpread)
        } else if z < -thresholds.entry_z {
            Transition::Enter(Direction::LongSpread)
        } else {
            Transition::Hold
        }
    } else if z.abs() < thresholds.exit_z {
        Transition::Exit
    } else {
        Transition::Hold
    }
}

/// Strategy return of one bar: `units × (r1 − β·r2)`, or exactly 0.0 when
/// flat or when either leg's return (or β) is undefined.
pub fn bar_return(position: Position, r1: Option<Rate>, r2: Option<Rate>, beta: Option<f64>) -> Rate {
    if position.is_flat() {
        return 0.0;
    }
    match (r1, r2, beta) {
        (Some(r1), Some(r2), Some(beta)) => {
            let r = f64::from(position.units()) * (r1 - beta * r2);
            if r.is_finite() {
                r
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Flat, or holding one spread position with its entry context.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    open: Option<OpenTrade>,
}

impl PositionBook {
    pub fn position(&self) -> Position {
        self.open
            .map_or(Position::Flat, |open| Position::from(open.direction))
    }

    pub fn open_trade(&self) -> Option<&OpenTrade> {
        self.open.as_ref()
    }

    fn enter(&mut self, direction: Direction, index: usize, date: NaiveDate, z: ZScore) {
        self.open = Some(OpenTrade {
            direction,
            entry_index: index,
            entry_date: date,
            entry_z: z,
        });
    }

    /// Close the open position; `returns` must already hold this bar's return.
    fn close(&mut self, index: usize, date: NaiveDate, z: ZScore, returns: &[Rate]) -> Option<Trade> {
        let open = self.open.take()?;
        let pnl: Rate = returns[open.entry_index..=index].iter().sum();
        Some(Trade {
            direction: open.direction,
            entry_date: open.entry_date,
            exit_date: date,
            entry_index: open.entry_index,
            exit_index: index,
            entry_z: open.entry_z,
            exit_z: z,
            pnl,
            return_pct: pnl,
            bars_held: index - open.entry_index,
        })
    }
}

/// Scan the calendar bar by bar.
///
/// Bar 0 is always flat with a zero return. A position opened on bar `i`
/// already earns bar `i`'s return: the entry bar's own price move is
/// captured by the new position.
pub fn simulate(
    dates: &[NaiveDate],
    zscore: &[Option<ZScore>],
    returns1: &[Option<Rate>],
    returns2: &[Option<Rate>],
    beta: Option<f64>,
    thresholds: &Thresholds,
) -> Simulation {
    let n = dates.len();
    let mut book = PositionBook::default();
    let mut positions = Vec::with_capacity(n);
    let mut strategy_returns = Vec::with_capacity(n);
    let mut trades = Vec::new();

    for (i, &date) in dates.iter().enumerate() {
        if i == 0 {
            positions.push(Position::Flat);
            strategy_returns.push(0.0);
            continue;
        }

        let z = zscore.get(i).copied().flatten();
        let transition = next_transition(book.position(), z, thresholds);

        let position = match transition {
            Transition::Enter(direction) => {
                // Enter is only produced with a defined z
                book.enter(direction, i, date, z.unwrap_or_default());
                Position::from(direction)
            }
            Transition::Exit => Position::Flat,
            Transition::Hold => book.position(),
        };

        let r1 = returns1.get(i).copied().flatten();
        let r2 = returns2.get(i).copied().flatten();
        strategy_returns.push(bar_return(position, r1, r2, beta));
        positions.push(position);

        if transition == Transition::Exit {
            if let Some(trade) = book.close(i, date, z.unwrap_or_default(), &strategy_returns) {
                trades.push(trade);
            }
        }
    }

    Simulation {
        positions,
        strategy_returns,
        trades,
        open_trade: book.open_trade().copied(),
    }
}
