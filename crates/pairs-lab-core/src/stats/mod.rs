pub mod descriptive;
pub mod half_life;
pub mod regression;
pub mod rolling;

pub use descriptive::{mean, pct_change, pearson_correlation, sample_std};
pub use half_life::{estimate_half_life, half_life, HalfLifeEstimate};
pub use regression::{hedge_ratio, linear_fit, LinearFit};
pub use rolling::{rolling_mean, rolling_std};
