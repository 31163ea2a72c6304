//! Causal IIR filtering.
//!
//! Matches `scipy.signal.lfilter(b, a, x)` with zero initial conditions:
//! a single forward pass, so the output lags the input by the filter's group
//! delay. No reverse pass, no edge padding.
use ndarray::{Array1, ArrayView1};

use super::design::{butter_lowpass, Sos};
use crate::error::Result;

/// Run `x` through the cascade `sos`, each section in transposed direct
/// form II starting from rest.
///
/// Returns a vector of the same length as `x`.
pub fn sosfilt(sos: &[Sos], x: ArrayView1<f64>) -> Array1<f64> {
    let mut y = x.to_owned();
    for s in sos {
        let [b0, b1, b2] = s.b;
        let [_, a1, a2] = s.a;
        let (mut z1, mut z2) = (0.0_f64, 0.0_f64);
        for v in y.iter_mut() {
            let input = *v;
            let out = b0 * input + z1;
            z1 = b1 * input - a1 * out + z2;
            z2 = b2 * input - a2 * out;
            *v = out;
        }
    }
    y
}

/// Lowpass `x` at `cutoff` Hz with an `order`-th order Butterworth filter,
/// applied causally.
///
/// Fails with [`InvalidFilterParameters`](crate::FeatureError::InvalidFilterParameters)
/// unless `0 < cutoff < sfreq/2` and `order >= 1`.
pub fn lowpass(x: ArrayView1<f64>, cutoff: f64, sfreq: f64, order: usize) -> Result<Array1<f64>> {
    let sos = butter_lowpass(order, cutoff, sfreq)?;
    Ok(sosfilt(&sos, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn filter_preserves_length() {
        let x = Array1::from_shape_fn(1000, |i| (i as f64 * 0.1).sin());
        let y = lowpass(x.view(), 1.0, 64.0, 4).unwrap();
        assert_eq!(y.len(), x.len());
    }

    #[test]
    fn empty_in_empty_out() {
        let x = Array1::<f64>::zeros(0);
        assert!(lowpass(x.view(), 1.0, 4.0, 4).unwrap().is_empty());
    }

    #[test]
    fn causal_first_output_is_b0_times_first_input() {
        // Starting from rest, y[0] = b0_total · x[0].
        let sos = butter_lowpass(4, 1.0, 4.0).unwrap();
        let b0: f64 = sos.iter().map(|s| s.b[0]).product();
        let x = Array1::from(vec![3.0, 0.0, 0.0]);
        let y = sosfilt(&sos, x.view());
        approx::assert_abs_diff_eq!(y[0], 3.0 * b0, epsilon = 1e-15);
    }

    #[test]
    fn settles_to_dc_level() {
        let x = Array1::from_elem(2000, 5.0);
        let y = lowpass(x.view(), 1.0, 64.0, 4).unwrap();
        approx::assert_abs_diff_eq!(y[1999], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_cutoff_is_an_error() {
        let x = Array1::from_elem(10, 1.0);
        assert!(lowpass(x.view(), 3.0, 4.0, 4).is_err());
    }
}
