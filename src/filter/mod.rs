//! Butterworth lowpass design and application.
//!
//! - [`design`]: digital Butterworth lowpass as second-order sections,
//!   matching `scipy.signal.butter(N, Wn, btype='low')`.
//! - [`apply`]: single-pass causal filtering, matching
//!   `scipy.signal.lfilter(b, a, x)`.

pub mod apply;
pub mod design;

pub use design::{butter_lowpass, check_lowpass_params, magnitude_response, sos_to_tf, Sos};
pub use apply::{lowpass, sosfilt};
