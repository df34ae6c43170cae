pub mod backtest;
pub mod screening;
pub mod stats;
