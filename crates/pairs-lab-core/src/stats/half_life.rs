use serde::{Deserialize, Serialize};
use serde_json::json;
use std::f64::consts::LN_2;
use std::time::Instant;

use super::regression::linear_fit;
use crate::types::{with_metadata, ComputationOutput};

/// Half-life together with the regression it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfLifeEstimate {
    pub half_life: Option<f64>,
    /// Slope of Δs on the lagged level
    pub phi: Option<f64>,
    /// Finite observations used
    pub observations: usize,
}

/// Mean-reversion half-life of a spread, in bars.
///
/// Regresses the first difference `s(t) - s(t-1)` on the lagged level
/// `s(t-1)` with an intercept; the slope φ gives `half_life = -ln 2 / φ`.
/// Non-finite observations are dropped before differencing.
///
/// Returns `None` when fewer than two observations remain, when the
/// regression is singular, or when φ ≥ 0 (no mean reversion).
pub fn half_life(spread: &[f64]) -> Option<f64> {
    fit_half_life(spread).half_life
}

/// [`half_life`] wrapped in the standard output envelope.
pub fn estimate_half_life(spread: &[f64]) -> ComputationOutput<HalfLifeEstimate> {
    let start = Instant::now();
    let estimate = fit_half_life(spread);

    let mut warnings = Vec::new();
    if estimate.observations < spread.len() {
        warnings.push(format!(
            "{} non-finite observations dropped",
            spread.len() - estimate.observations
        ));
    }
    match estimate.phi {
        None => warnings.push("Regression singular: half-life undefined".into()),
        Some(phi) if phi >= 0.0 => {
            warnings.push(format!("phi = {:.6} >= 0: spread is not mean-reverting", phi))
        }
        Some(_) => {}
    }

    with_metadata(
        "OLS of first difference on lagged level, half-life = -ln2 / phi",
        &json!({ "observations_supplied": spread.len() }),
        warnings,
        start.elapsed().as_micros() as u64,
        estimate,
    )
}

fn fit_half_life(spread: &[f64]) -> HalfLifeEstimate {
    let clean: Vec<f64> = spread.iter().copied().filter(|v| v.is_finite()).collect();
    let observations = clean.len();
    if observations < 2 {
        return HalfLifeEstimate { half_life: None, phi: None, observations };
    }

    let lagged = &clean[..observations - 1];
    let delta: Vec<f64> = clean.windows(2).map(|w| w[1] - w[0]).collect();

    let phi = linear_fit(lagged, &delta).map(|fit| fit.slope);
    let half_life = phi
        .filter(|phi| *phi < 0.0)
        .map(|phi| -LN_2 / phi)
        .filter(|hl| hl.is_finite());
    HalfLifeEstimate { half_life, phi, observations }
}
