use serde::{Deserialize, Serialize};

/// Prices are plain floats. Missing values never reach the core.
pub type Price = f64;

/// Simple returns expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = f64;

/// Standardised spread value (number of rolling standard deviations)
pub type ZScore = f64;

/// Trading days used for annualisation
pub const ANNUAL_TRADING_DAYS: f64 = 252.0;

/// Side of an open spread position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Buy ticker1, sell ticker2 (spread too low)
    LongSpread,
    /// Sell ticker1, buy ticker2 (spread too high)
    ShortSpread,
}

/// Position held over a single bar.
///
/// Serialised as the signed unit size (-1, 0, 1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Position {
    #[default]
    Flat,
    LongSpread,
    ShortSpread,
}

impl Position {
    /// Signed unit exposure to the spread.
    pub fn units(self) -> i8 {
        match self {
            Position::Flat => 0,
            Position::LongSpread => 1,
            Position::ShortSpread => -1,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Position::Flat => None,
            Position::LongSpread => Some(Direction::LongSpread),
            Position::ShortSpread => Some(Direction::ShortSpread),
        }
    }

    pub fn is_flat(self) -> bool {
        self == Position::Flat
    }
}

impl From<Direction> for Position {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::LongSpread => Position::LongSpread,
            Direction::ShortSpread => Position::ShortSpread,
        }
    }
}

impl From<Position> for i8 {
    fn from(position: Position) -> Self {
        position.units()
    }
}

impl TryFrom<i8> for Position {
    type Error = String;

    fn try_from(units: i8) -> Result<Self, Self::Error> {
        match units {
            0 => Ok(Position::Flat),
            1 => Ok(Position::LongSpread),
            -1 => Ok(Position::ShortSpread),
            other => Err(format!("position must be -1, 0 or 1, got {}", other)),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_units() {
        assert_eq!(Position::Flat.units(), 0);
        assert_eq!(Position::LongSpread.units(), 1);
        assert_eq!(Position::ShortSpread.units(), -1);
    }

    #[test]
    fn test_position_serialises_as_signed_unit() {
        let json = serde_json::to_string(&vec![
            Position::ShortSpread,
            Position::Flat,
            Position::LongSpread,
        ])
        .unwrap();
        assert_eq!(json, "[-1,0,1]");
    }

    #[test]
    fn test_position_rejects_fractional_sizes() {
        let parsed: Result<Position, _> = serde_json::from_str("2");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_direction_snake_case() {
        let json = serde_json::to_string(&Direction::LongSpread).unwrap();
        assert_eq!(json, "\"long_spread\"");
        assert_eq!(Position::from(Direction::ShortSpread), Position::ShortSpread);
        assert_eq!(Position::ShortSpread.direction(), Some(Direction::ShortSpread));
        assert_eq!(Position::Flat.direction(), None);
    }
}
