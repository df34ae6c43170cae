use serde::{Deserialize, Serialize};

use crate::stats::{rolling_mean, rolling_std};
use crate::types::{Price, ZScore};

/// Spread and its rolling standardisation, one element per bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSeries {
    pub spread: Vec<Option<f64>>,
    pub rolling_mean: Vec<Option<f64>>,
    pub rolling_std: Vec<Option<f64>>,
    pub zscore: Vec<Option<ZScore>>,
}

/// `price1 - β·price2`; entirely undefined when β is.
pub fn spread_series(price1: &[Price], price2: &[Price], beta: Option<f64>) -> Vec<Option<f64>> {
    price1
        .iter()
        .zip(price2)
        .map(|(p1, p2)| beta.map(|b| p1 - b * p2).filter(|s| s.is_finite()))
        .collect()
}

/// `(spread - mean) / std`, undefined wherever any input is undefined or the
/// rolling standard deviation is zero.
pub fn zscore_series(
    spread: &[Option<f64>],
    mean: &[Option<f64>],
    std: &[Option<f64>],
) -> Vec<Option<ZScore>> {
    spread
        .iter()
        .zip(mean)
        .zip(std)
        .map(|((s, m), sd)| match (s, m, sd) {
            (Some(s), Some(m), Some(sd)) if *sd != 0.0 => {
                let z = (s - m) / sd;
                z.is_finite().then_some(z)
            }
            _ => None,
        })
        .collect()
}

/// Build the full signal for one pair over a trailing window of `lookback` bars.
pub fn build_signal(
    price1: &[Price],
    price2: &[Price],
    beta: Option<f64>,
    lookback: usize,
) -> SignalSeries {
    let spread = spread_series(price1, price2, beta);
    let rolling_mean = rolling_mean(&spread, lookback);
    let rolling_std = rolling_std(&spread, lookback);
    let zscore = zscore_series(&spread, &rolling_mean, &rolling_std);
    SignalSeries {
        spread,
        rolling_mean,
        rolling_std,
        zscore,
    }
}
