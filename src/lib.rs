//! # wristfeat — windowed features from wrist physiological recordings
//!
//! `wristfeat` turns per-subject wrist sensor recordings (EDA, BVP, TEMP and
//! ACC, each at its own native rate) into one flat table of 30-second window
//! statistics, with each subject's demographics attached to every row.
//!
//! ## Pipeline overview
//!
//! ```text
//! <data_dir>/S<n>/S<n>.safetensors        <data_dir>/S<n>/S<n>_readme.txt
//!   │                                        │
//!   ├─ io::RawRecording::load()              └─ demographics::load_demographics()
//!   ├─ flatten channel → 1-D                       │
//!   ├─ filter::lowpass()     causal Butterworth, 1 Hz, order 4
//!   ├─ window::featurize()   non-overlapping windows → {mean, std, min, max}
//!   └─ tag rows with signal, subject ─────────────┘
//!        │
//!        └─→ dataset::DatasetAggregator → one CSV (roster → channel → window order)
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use wristfeat::{DatasetAggregator, PipelineConfig};
//!
//! let cfg = PipelineConfig {
//!     data_dir: "WESAD".into(),
//!     subjects: vec![2, 3, 4],
//!     ..PipelineConfig::default()
//! };
//! let summary = DatasetAggregator::new(cfg)?.run()?;
//! println!("{summary}");
//! # Ok::<(), wristfeat::FeatureError>(())
//! ```
//!
//! ## Running individual steps
//!
//! ```
//! use wristfeat::filter::lowpass;
//! use wristfeat::window::{featurize, window_size};
//! use ndarray::Array1;
//!
//! // Two minutes of EDA at 4 Hz.
//! let eda = Array1::from_shape_fn(480, |i| 0.4 + 0.01 * (i as f64 * 0.1).sin());
//! let filtered = lowpass(eda.view(), 1.0, 4.0, 4).unwrap();
//! let windows = featurize(filtered.view(), window_size(4.0, 30.0));
//! assert_eq!(windows.len(), 4);
//! ```

pub mod channel;
pub mod config;
pub mod dataset;
pub mod demographics;
pub mod error;
pub mod filter;
pub mod io;
pub mod logging;
pub mod subject;
pub mod table;
pub mod window;

// ── Crate-root re-exports ─────────────────────────────────────────────────

pub use channel::Channel;
pub use config::PipelineConfig;
pub use dataset::{Dataset, DatasetAggregator, RunSummary};
pub use demographics::{load_demographics, parse_demographics, Demographics, ParsedDemographics};
pub use error::{FeatureError, RecordingError, Result};
pub use filter::{butter_lowpass, lowpass, sosfilt, Sos};
pub use io::{RawRecording, StWriter};
pub use subject::{ChannelOutcome, SubjectFeatures, SubjectPipeline};
pub use table::{write_table, FeatureWindow};
pub use window::{featurize, window_count, window_stats, WindowStats};
