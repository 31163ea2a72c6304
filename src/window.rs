//! Fixed-length windowing and per-window statistics.
//!
//! Splits a 1-D signal into non-overlapping windows of `window_samples`
//! samples, dropping any trailing incomplete window, and summarises each one
//! as `{mean, std, min, max}`. `std` is the population deviation (`ddof = 0`,
//! numpy's default).
use ndarray::ArrayView1;

/// Summary statistics of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Samples per window: `floor(sfreq × duration)`.
pub fn window_size(sfreq: f64, duration: f64) -> usize {
    (sfreq * duration) as usize
}

/// Number of complete windows in a signal of `len` samples.
///
/// A zero window size yields zero windows.
pub fn window_count(len: usize, window_samples: usize) -> usize {
    if window_samples == 0 {
        0
    } else {
        len / window_samples
    }
}

/// Statistics of a non-empty window.
pub fn window_stats(window: ArrayView1<f64>) -> WindowStats {
    let n = window.len() as f64;
    let mean = window.sum() / n;
    let var = window.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let (min, max) = window
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    WindowStats { mean, std: var.sqrt(), min, max }
}

/// Summarise every complete window of `signal`, in time order.
///
/// Window `i` covers samples `[i · window_samples, (i + 1) · window_samples)`.
/// An empty signal, or one shorter than a window, yields an empty `Vec`.
pub fn featurize(signal: ArrayView1<f64>, window_samples: usize) -> Vec<WindowStats> {
    if window_samples == 0 {
        return vec![];
    }
    signal
        .exact_chunks(window_samples)
        .into_iter()
        .map(window_stats)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn trailing_samples_dropped() {
        // 250 samples with window 120 → 2 windows (10 trailing samples dropped).
        let x = Array1::from_elem(250, 0.5);
        assert_eq!(featurize(x.view(), 120).len(), 2);
        assert_eq!(window_count(250, 120), 2);
    }

    #[test]
    fn zero_window_size_yields_nothing() {
        let x = Array1::from_elem(10, 1.0);
        assert!(featurize(x.view(), 0).is_empty());
        assert_eq!(window_count(10, 0), 0);
    }

    #[test]
    fn population_std() {
        // [1, 2, 3, 4]: mean 2.5, var = 1.25 (ddof = 0).
        let x = Array1::from(vec![1.0, 2.0, 3.0, 4.0]);
        let s = window_stats(x.view());
        approx::assert_abs_diff_eq!(s.mean, 2.5);
        approx::assert_abs_diff_eq!(s.std, 1.25_f64.sqrt(), epsilon = 1e-15);
        assert_eq!((s.min, s.max), (1.0, 4.0));
    }

    #[test]
    fn window_size_floors() {
        assert_eq!(window_size(4.0, 30.0), 120);
        assert_eq!(window_size(64.0, 30.0), 1920);
        assert_eq!(window_size(4.0, 0.3), 1);
    }
}
