//! Butterworth lowpass design matching `scipy.signal.butter`.
//!
//! For a lowpass at `cutoff` Hz with sampling rate `sfreq`:
//!   • normalised cutoff  Wn = cutoff / (sfreq / 2)
//!   • prewarped analog cutoff Ω = tan(π · Wn / 2)
//!   • analog prototype poles paired into quadratics
//!     `s² + 2·sin(θₖ)·Ω·s + Ω²`, θₖ = π(2k + 1) / 2N, plus `s + Ω` for odd N
//!   • bilinear transform `s = (1 − z⁻¹) / (1 + z⁻¹)` per section
//!
//! The result is a cascade of second-order sections. Multiplied out it is the
//! `(b, a)` pair SciPy returns; the cascade form just keeps high orders at low
//! cutoffs numerically sane.
use std::f64::consts::PI;

use crate::error::{FeatureError, Result};

/// One second-order section.
///
/// `H(z) = (b0 + b1 z⁻¹ + b2 z⁻²) / (1 + a1 z⁻¹ + a2 z⁻²)`; `a[0]` is always 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sos {
    pub b: [f64; 3],
    pub a: [f64; 3],
}

/// Check `0 < cutoff < sfreq/2` and `order >= 1`.
pub fn check_lowpass_params(cutoff: f64, sfreq: f64, order: usize) -> Result<()> {
    let nyq = 0.5 * sfreq;
    if order == 0 || !(cutoff > 0.0) || !(cutoff < nyq) {
        return Err(FeatureError::InvalidFilterParameters { cutoff, sfreq, order });
    }
    Ok(())
}

/// Design an `order`-th order digital Butterworth lowpass as `ceil(order/2)`
/// second-order sections.
///
/// Matches `scipy.signal.butter(order, cutoff / (sfreq / 2), btype='low')`.
pub fn butter_lowpass(order: usize, cutoff: f64, sfreq: f64) -> Result<Vec<Sos>> {
    check_lowpass_params(cutoff, sfreq, order)?;

    let wn = cutoff / (0.5 * sfreq);
    let omega = (PI * wn / 2.0).tan();
    let omega2 = omega * omega;

    let mut sections = Vec::with_capacity(order.div_ceil(2));

    for k in 0..order / 2 {
        let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64;
        let damp = 2.0 * theta.sin() * omega;
        let d = 1.0 + damp + omega2;
        let g = omega2 / d;
        sections.push(Sos {
            b: [g, 2.0 * g, g],
            a: [1.0, 2.0 * (omega2 - 1.0) / d, (1.0 - damp + omega2) / d],
        });
    }

    // Odd order: the real pole at −Ω becomes a first-order section.
    if order % 2 == 1 {
        let g = omega / (1.0 + omega);
        sections.push(Sos {
            b: [g, g, 0.0],
            a: [1.0, (omega - 1.0) / (omega + 1.0), 0.0],
        });
    }

    Ok(sections)
}

/// Multiply a cascade out into transfer-function coefficients `(b, a)`.
///
/// Returned vectors have length `2 · n_sections + 1`; trailing zeros of odd
/// orders are trimmed so the length is `order + 1`.
pub fn sos_to_tf(sos: &[Sos]) -> (Vec<f64>, Vec<f64>) {
    let mut b = vec![1.0];
    let mut a = vec![1.0];
    for s in sos {
        b = poly_mul(&b, &s.b);
        a = poly_mul(&a, &s.a);
    }
    while b.len() > 1 && a.len() > 1 && b[b.len() - 1] == 0.0 && a[a.len() - 1] == 0.0 {
        b.pop();
        a.pop();
    }
    (b, a)
}

/// Magnitude response `|H(e^{jω})|` of a cascade at `freq` Hz.
pub fn magnitude_response(sos: &[Sos], freq: f64, sfreq: f64) -> f64 {
    let w = 2.0 * PI * freq / sfreq;
    sos.iter()
        .map(|s| {
            let eval = |c: &[f64; 3]| {
                let re = c[0] + c[1] * w.cos() + c[2] * (2.0 * w).cos();
                let im = -(c[1] * w.sin() + c[2] * (2.0 * w).sin());
                (re * re + im * im).sqrt()
            };
            eval(&s.b) / eval(&s.a)
        })
        .product()
}

fn poly_mul(p: &[f64], q: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; p.len() + q.len() - 1];
    for (i, &pi) in p.iter().enumerate() {
        for (j, &qj) in q.iter().enumerate() {
            out[i + j] += pi * qj;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_count() {
        for order in 1..=8 {
            let sos = butter_lowpass(order, 1.0, 64.0).unwrap();
            assert_eq!(sos.len(), order.div_ceil(2), "order {order}");
        }
    }

    #[test]
    fn tf_length_is_order_plus_one() {
        for order in 1..=6 {
            let (b, a) = sos_to_tf(&butter_lowpass(order, 1.0, 32.0).unwrap());
            assert_eq!(b.len(), order + 1);
            assert_eq!(a.len(), order + 1);
        }
    }

    #[test]
    fn unity_dc_gain() {
        for (cutoff, sfreq) in [(1.0, 4.0), (1.0, 64.0), (0.3, 32.0)] {
            let sos = butter_lowpass(4, cutoff, sfreq).unwrap();
            approx::assert_abs_diff_eq!(magnitude_response(&sos, 0.0, sfreq), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn half_power_at_cutoff() {
        // Butterworth: |H| = 1/√2 exactly at the cutoff, for every order.
        for order in [1, 2, 4, 5] {
            let sos = butter_lowpass(order, 1.0, 64.0).unwrap();
            let mag = magnitude_response(&sos, 1.0, 64.0);
            approx::assert_abs_diff_eq!(mag, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-9);
        }
    }

    #[test]
    fn poles_inside_unit_circle() {
        // For a quadratic 1 + a1 z⁻¹ + a2 z⁻², stability ⇔ |a2| < 1 and |a1| < 1 + a2.
        let sos = butter_lowpass(8, 0.05, 64.0).unwrap();
        for s in &sos {
            assert!(s.a[2].abs() < 1.0);
            assert!(s.a[1].abs() < 1.0 + s.a[2]);
        }
    }

    #[test]
    fn rejects_cutoff_at_nyquist() {
        assert!(butter_lowpass(4, 2.0, 4.0).is_err());
        assert!(butter_lowpass(4, 0.0, 4.0).is_err());
        assert!(butter_lowpass(0, 1.0, 4.0).is_err());
        assert!(butter_lowpass(4, f64::NAN, 4.0).is_err());
    }
}
