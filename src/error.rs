//! Error types.
//!
//! [`FeatureError`] is the pipeline-level taxonomy. Each variant has a fixed
//! blast radius: `SubjectLoad` drops one subject, `InvalidFilterParameters`
//! drops one channel, `DemographicParse` drops one field, and `OutputWrite`
//! and `Config` end the run.
use std::path::PathBuf;
use thiserror::Error;

/// Storage-level failure while reading a subject's recording file.
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed recording {path}: {reason}")]
    Format { path: PathBuf, reason: String },

    #[error("tensor `{key}` has unsupported dtype {dtype}")]
    UnsupportedDtype { key: String, dtype: String },
}

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("failed to load recording for subject {subject}: {source}")]
    SubjectLoad {
        subject: u32,
        #[source]
        source: RecordingError,
    },

    #[error("invalid lowpass parameters: cutoff {cutoff} Hz, order {order} at {sfreq} Hz (need 0 < cutoff < sfreq/2, order >= 1)")]
    InvalidFilterParameters { cutoff: f64, sfreq: f64, order: usize },

    #[error("demographic field `{field}` is not an integer: {value:?}")]
    DemographicParse { field: &'static str, value: String },

    #[error("failed to write output table {path}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FeatureError {
    /// Short label for the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureError::SubjectLoad { .. } => "subject load",
            FeatureError::InvalidFilterParameters { .. } => "invalid filter parameters",
            FeatureError::DemographicParse { .. } => "demographic parse",
            FeatureError::OutputWrite { .. } => "output write",
            FeatureError::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, FeatureError>;
