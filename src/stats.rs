//! Small numeric reducers used by the window aggregation commands.
//!
//! Degenerate inputs (empty samples, zero variance) never error: callers get
//! `None` or NaN and decide how to report it.

/// True for NaN and +/- infinity.
#[inline]
pub fn is_nan_or_inf(x: f64) -> bool {
    !x.is_finite()
}

/// Copy out the finite values of `x`.
pub fn no_nans(x: &[f64]) -> Vec<f64> {
    x.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Arithmetic mean, or `None` for an empty sample.
pub fn mean(x: &[f64]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    Some(x.iter().sum::<f64>() / x.len() as f64)
}

/// Sum, or `None` for an empty sample.
pub fn sum(x: &[f64]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    Some(x.iter().sum())
}

/// Lag-`lag` autocorrelation coefficient of `x`.
///
/// `r_k = sum_{t<n-k} (x_t - m)(x_{t+k} - m) / sum_t (x_t - m)^2`
///
/// Returns NaN when `x` is empty, when `lag >= x.len()` (except lag 0), or
/// when the sample has zero variance.
pub fn autocorrelation(x: &[f64], lag: usize) -> f64 {
    let n = x.len();
    if n == 0 || (lag > 0 && lag >= n) {
        return f64::NAN;
    }
    let m = x.iter().sum::<f64>() / n as f64;
    let denom: f64 = x.iter().map(|v| (v - m) * (v - m)).sum();
    let numer: f64 = x
        .iter()
        .zip(x[lag..].iter())
        .map(|(a, b)| (a - m) * (b - m))
        .sum();
    numer / denom
}

/// Coefficients for lags `1..=lags`, in lag order.
pub fn autocorrelations(x: &[f64], lags: usize) -> Vec<f64> {
    (1..=lags).map(|k| autocorrelation(x, k)).collect()
}
