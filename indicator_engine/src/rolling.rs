//! Trailing-window statistics.
//!
//! Each function returns one value per input position. Position `i` is
//! computed from `values[i + 1 - window..=i]`; the first `window - 1`
//! positions have no value. A zero window yields no values at all.

/// Simple moving average over the trailing `window` values.
///
/// Each window is summed on its own so long series carry no accumulated
/// rounding from earlier positions.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |win| win.iter().sum::<f64>() / window as f64)
}

/// Largest of the trailing `window` values.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, f64::max)
}

/// Smallest of the trailing `window` values.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, f64::min)
}

fn rolling_fold(values: &[f64], window: usize, pick: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    rolling_apply(values, window, |win| {
        win.iter().copied().reduce(pick).unwrap_or(f64::NAN)
    })
}

fn rolling_apply(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for (i, win) in values.windows(window).enumerate() {
        out[i + window - 1] = Some(f(win));
    }
    out
}
