//! Per-subject feature extraction.
//!
//! ```text
//! S<n>.safetensors ── RawRecording
//!   └─ for each configured channel present:
//!        flatten → lowpass (causal Butterworth) → featurize (fixed windows)
//!          └─ tag with channel, subject, Demographics (from S<n>_readme.txt)
//! ```
use ndarray::ArrayView1;
use tracing::{debug, warn};

use crate::channel::Channel;
use crate::config::PipelineConfig;
use crate::demographics::{load_demographics, Demographics};
use crate::error::{FeatureError, Result};
use crate::filter::lowpass;
use crate::io::RawRecording;
use crate::table::FeatureWindow;
use crate::window::{featurize, WindowStats};

/// What happened to one configured channel of one subject.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelOutcome {
    /// Filtered and windowed; `windows` may be zero for short signals.
    Featurized { windows: usize },
    /// The recording has no tensor for this channel.
    Absent,
    /// The channel could not be processed (e.g. cutoff above Nyquist).
    Failed { reason: String },
}

/// All rows for one subject plus per-channel bookkeeping.
#[derive(Debug, Clone)]
pub struct SubjectFeatures {
    pub subject: u32,
    pub rows: Vec<FeatureWindow>,
    pub channels: Vec<(Channel, ChannelOutcome)>,
    /// Demographic fields that were present but malformed.
    pub demographic_errors: usize,
}

/// Runs the per-subject steps under a fixed configuration.
pub struct SubjectPipeline<'a> {
    cfg: &'a PipelineConfig,
}

impl<'a> SubjectPipeline<'a> {
    pub fn new(cfg: &'a PipelineConfig) -> Self {
        Self { cfg }
    }

    /// Load, filter, window and tag every configured channel of `subject`.
    ///
    /// Fails only when the recording itself cannot be loaded.
    pub fn run(&self, subject: u32) -> Result<SubjectFeatures> {
        let path = self.cfg.recording_path(subject);
        let recording = RawRecording::load(&path)
            .map_err(|source| FeatureError::SubjectLoad { subject, source })?;

        let parsed = load_demographics(&self.cfg.readme_path(subject), subject);
        let (rows, channels) = self.featurize_recording(subject, &recording, &parsed.demographics);

        Ok(SubjectFeatures {
            subject,
            rows,
            channels,
            demographic_errors: parsed.errors.len(),
        })
    }

    /// Featurize an already-loaded recording.
    ///
    /// Rows come out in configured channel order, then window order.
    pub fn featurize_recording(
        &self,
        subject: u32,
        recording: &RawRecording,
        demographics: &Demographics,
    ) -> (Vec<FeatureWindow>, Vec<(Channel, ChannelOutcome)>) {
        let mut rows = Vec::new();
        let mut outcomes = Vec::with_capacity(self.cfg.channels.len());

        for &channel in &self.cfg.channels {
            let Some(samples) = recording.flattened(channel) else {
                debug!(subject, %channel, "channel absent");
                outcomes.push((channel, ChannelOutcome::Absent));
                continue;
            };

            match self.channel_features(channel, samples.view()) {
                Ok(stats) => {
                    debug!(subject, %channel, samples = samples.len(), windows = stats.len(), "featurized");
                    outcomes.push((channel, ChannelOutcome::Featurized { windows: stats.len() }));
                    rows.extend(
                        stats
                            .into_iter()
                            .map(|s| FeatureWindow::new(s, channel, subject, demographics)),
                    );
                }
                Err(e) => {
                    warn!(subject, %channel, "{e}; channel skipped");
                    outcomes.push((channel, ChannelOutcome::Failed { reason: e.to_string() }));
                }
            }
        }
        (rows, outcomes)
    }

    /// Lowpass then window one channel's flattened samples.
    pub fn channel_features(&self, channel: Channel, samples: ArrayView1<f64>) -> Result<Vec<WindowStats>> {
        let sfreq = self
            .cfg
            .sampling_rate(channel)
            .ok_or_else(|| FeatureError::Config(format!("no sampling rate for {channel}")))?;
        let filtered = lowpass(samples, self.cfg.filter_cutoff, sfreq, self.cfg.filter_order)?;
        let window_samples = crate::window::window_size(sfreq, self.cfg.window_duration);
        Ok(featurize(filtered.view(), window_samples))
    }
}
