use statrs::statistics::Statistics;

// ---------------------------------------------------------------------------
// Sample statistics over f64 slices
// ---------------------------------------------------------------------------

/// True when every element is bit-for-bit equal to the first.
pub(crate) fn all_equal(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

/// Arithmetic mean, `None` for an empty or non-finite input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let m = values.iter().mean();
    m.is_finite().then_some(m)
}

/// Sample standard deviation (N-1 denominator).
///
/// A window of identical values returns exactly `0.0`; the streaming
/// variance would otherwise leave rounding residue of order 1e-17 and
/// downstream z-scores would explode instead of becoming undefined.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    if all_equal(values) {
        return Some(0.0);
    }
    let sd = values.iter().std_dev();
    sd.is_finite().then_some(sd)
}

/// Pearson correlation coefficient between two equal-length series.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some(cov / denom)
}

/// One-period simple returns. The first element is always `None`, as is
/// any period whose return is not finite (previous price of zero).
pub fn pct_change(prices: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }
    out.push(None);
    for w in prices.windows(2) {
        let r = w[1] / w[0] - 1.0;
        out.push(r.is_finite().then_some(r));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_sample_std_uses_n_minus_one() {
        // deviations from mean 5: 9,1,1,1,0,0,4,16 -> ss = 32, /7
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = sample_std(&v).unwrap();
        assert!((sd - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_constant_is_exact_zero() {
        let v = [0.1; 60];
        assert_eq!(sample_std(&v), Some(0.0));
    }

    #[test]
    fn test_sample_std_needs_two_points() {
        assert_eq!(sample_std(&[1.0]), None);
    }

    #[test]
    fn test_pearson_perfect_positive() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 2.0).collect();
        assert!(pearson_correlation(&x, &y).unwrap() > 0.999);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 11.0 - v).collect();
        assert!(pearson_correlation(&x, &y).unwrap() < -0.999);
    }

    #[test]
    fn test_pearson_zero_variance_is_undefined() {
        let x = [1.0, 1.0, 1.0];
        let y = [1.0, 2.0, 3.0];
        assert_eq!(pearson_correlation(&x, &y), None);
    }

    #[test]
    fn test_pct_change() {
        let r = pct_change(&[100.0, 110.0, 99.0]);
        assert_eq!(r[0], None);
        assert!((r[1].unwrap() - 0.1).abs() < 1e-12);
        assert!((r[2].unwrap() + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_pct_change_from_zero_price_is_undefined() {
        let r = pct_change(&[0.0, 1.0]);
        assert_eq!(r, vec![None, None]);
    }
}
