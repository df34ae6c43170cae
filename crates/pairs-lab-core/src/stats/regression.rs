use serde::{Deserialize, Serialize};

use super::descriptive::all_equal;

/// First-degree least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Ordinary least squares of `y` on a single regressor `x` with intercept.
///
/// Returns `None` when the system is singular: fewer than two points, a
/// constant regressor, or a non-finite result.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = x.len();
    if n < 2 || y.len() != n || all_equal(x) {
        return None;
    }
    let n_f = n as f64;
    let mean_x = x.iter().sum::<f64>() / n_f;
    let mean_y = y.iter().sum::<f64>() / n_f;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return None;
    }
    Some(LinearFit { slope, intercept })
}

/// Hedge ratio β from regressing `price1` on `price2`.
///
/// Only the slope is kept. The fitted intercept is discarded and is *not*
/// removed from the spread, so `price1 - β·price2` carries a constant offset
/// that only the rolling mean of the signal builder takes out again.
pub fn hedge_ratio(price1: &[f64], price2: &[f64]) -> Option<f64> {
    linear_fit(price2, price1).map(|fit| fit.slope)
}
