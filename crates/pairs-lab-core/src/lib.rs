pub mod data;
pub mod error;
pub mod stats;
pub mod types;

#[cfg(feature = "backtest")]
pub mod backtest;

#[cfg(feature = "screening")]
pub mod screening;

pub use error::PairsLabError;
pub use types::*;

/// Standard result type for all pairs-lab operations
pub type PairsLabResult<T> = Result<T, PairsLabError>;
