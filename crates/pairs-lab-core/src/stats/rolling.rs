use super::descriptive::{mean, sample_std};

/// Apply `stat` to every trailing window of exactly `window` observations.
///
/// The first `window - 1` outputs are `None`, as is any window containing an
/// undefined value.
fn rolling<F>(values: &[Option<f64>], window: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || window > n {
        return out;
    }
    let mut buf: Vec<f64> = Vec::with_capacity(window);
    for end in (window - 1)..n {
        buf.clear();
        buf.extend(values[end + 1 - window..=end].iter().map_while(|v| *v));
        if buf.len() == window {
            out[end] = stat(&buf);
        }
    }
    out
}

/// Trailing rolling mean.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, mean)
}

/// Trailing rolling sample standard deviation (N-1 denominator).
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, sample_std)
}
