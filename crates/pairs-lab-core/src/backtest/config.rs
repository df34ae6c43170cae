use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::ZScore;
use crate::{PairsLabError, PairsLabResult};

/// Bars required on top of the lookback window before a run is attempted.
pub const MIN_BARS_BEYOND_LOOKBACK: usize = 10;

pub const DEFAULT_LOOKBACK: usize = 60;
pub const DEFAULT_ENTRY_Z: ZScore = 2.0;
pub const DEFAULT_EXIT_Z: ZScore = 0.5;

fn default_lookback() -> usize {
    DEFAULT_LOOKBACK
}

fn default_entry_z() -> ZScore {
    DEFAULT_ENTRY_Z
}

fn default_exit_z() -> ZScore {
    DEFAULT_EXIT_Z
}

/// Parameters of a single pair backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Dependent leg (regressed on ticker2)
    pub ticker1: String,
    /// Hedge leg
    pub ticker2: String,
    /// Inclusive lower date bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Rolling window length for the z-score (default 60)
    #[serde(default = "default_lookback")]
    pub lookback: usize,
    /// |z| needed to open a position (default 2.0)
    #[serde(default = "default_entry_z")]
    pub entry_z: ZScore,
    /// |z| below which an open position is closed (default 0.5)
    #[serde(default = "default_exit_z")]
    pub exit_z: ZScore,
}

/// Entry and exit bands of the position state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub entry_z: ZScore,
    pub exit_z: ZScore,
}

impl BacktestConfig {
    /// Config for a pair with default window and thresholds.
    pub fn new(ticker1: impl Into<String>, ticker2: impl Into<String>) -> Self {
        BacktestConfig {
            ticker1: ticker1.into(),
            ticker2: ticker2.into(),
            start_date: None,
            end_date: None,
            lookback: DEFAULT_LOOKBACK,
            entry_z: DEFAULT_ENTRY_Z,
            exit_z: DEFAULT_EXIT_Z,
        }
    }

    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.ticker1, self.ticker2)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            entry_z: self.entry_z,
            exit_z: self.exit_z,
        }
    }

    /// Smallest number of aligned bars a run accepts.
    pub fn min_bars(&self) -> usize {
        self.lookback.saturating_add(MIN_BARS_BEYOND_LOOKBACK)
    }

    pub fn validate(&self) -> PairsLabResult<()> {
        if self.ticker1.trim().is_empty() {
            return Err(PairsLabError::InvalidInput {
                field: "ticker1".into(),
                reason: "Ticker must be non-empty".into(),
            });
        }
        if self.ticker2.trim().is_empty() {
            return Err(PairsLabError::InvalidInput {
                field: "ticker2".into(),
                reason: "Ticker must be non-empty".into(),
            });
        }
        if self.lookback < 2 {
            return Err(PairsLabError::InvalidInput {
                field: "lookback".into(),
                reason: format!("Lookback must be at least 2, got {}", self.lookback),
            });
        }
        if !self.entry_z.is_finite() || self.entry_z <= 0.0 {
            return Err(PairsLabError::InvalidInput {
                field: "entry_z".into(),
                reason: "Entry z-score must be positive".into(),
            });
        }
        if !self.exit_z.is_finite() || self.exit_z < 0.0 {
            return Err(PairsLabError::InvalidInput {
                field: "exit_z".into(),
                reason: "Exit z-score must be non-negative".into(),
            });
        }
        if self.exit_z >= self.entry_z {
            return Err(PairsLabError::InvalidInput {
                field: "exit_z".into(),
                reason: format!(
                    "Exit z-score {} must be below entry z-score {}",
                    self.exit_z, self.entry_z
                ),
            });
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(PairsLabError::DateError(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
        }
        Ok(())
    }
}
