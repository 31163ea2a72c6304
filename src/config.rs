//! Pipeline configuration.
//!
//! [`PipelineConfig`] holds every tunable parameter of a feature-extraction
//! run. All fields have defaults matching the reference study setup
//! (15-subject roster, Empatica-style wrist sensor rates, 30 s windows,
//! 1 Hz / 4th-order lowpass).
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::channel::Channel;
use crate::error::{FeatureError, Result};

/// Configuration for a full dataset run.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use wristfeat::PipelineConfig;
///
/// let cfg = PipelineConfig {
///     subjects: vec![2, 3],
///     window_duration: 60.0,
///     ..PipelineConfig::default()
/// };
/// assert_eq!(cfg.filter_order, 4);
/// ```
///
/// A TOML file can override any subset of fields, see
/// [`PipelineConfig::from_toml_file`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Subject identifiers to process, in output order.
    ///
    /// Subject `n` is read from `<data_dir>/S<n>/`.
    ///
    /// Default: `[2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 14, 15, 16, 17]`.
    pub subjects: Vec<u32>,

    /// Native sampling rate of each channel in Hz.
    ///
    /// Default: ACC 32, BVP 64, EDA 4, TEMP 4.
    pub sampling_rates: BTreeMap<Channel, f64>,

    /// Duration of each feature window in seconds.
    ///
    /// Windows are non-overlapping; trailing samples that do not fill a
    /// complete window are discarded. At 4 Hz the default gives 120 samples.
    ///
    /// Default: `30.0` s.
    pub window_duration: f64,

    /// Lowpass cutoff in Hz. Must lie strictly below each featurized
    /// channel's Nyquist frequency.
    ///
    /// Default: `1.0` Hz.
    pub filter_cutoff: f64,

    /// Butterworth filter order.
    ///
    /// Default: `4`.
    pub filter_order: usize,

    /// Channels to featurize, in row order. ACC is loaded with the
    /// recording but left out by default.
    ///
    /// Default: `[EDA, BVP, TEMP]`.
    pub channels: Vec<Channel>,

    /// Root of the subject store.
    ///
    /// Default: `WESAD`.
    pub data_dir: PathBuf,

    /// Destination of the feature table.
    ///
    /// Default: `processed_participants.csv`.
    pub output: PathBuf,

    /// Process subjects on the rayon thread pool. Row order is the same
    /// as a sequential run.
    ///
    /// Default: `false`.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            subjects: vec![2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 14, 15, 16, 17],
            sampling_rates: BTreeMap::from([
                (Channel::Acc, 32.0),
                (Channel::Bvp, 64.0),
                (Channel::Eda, 4.0),
                (Channel::Temp, 4.0),
            ]),
            window_duration: 30.0,
            filter_cutoff: 1.0,
            filter_order: 4,
            channels: vec![Channel::Eda, Channel::Bvp, Channel::Temp],
            data_dir: PathBuf::from("WESAD"),
            output: PathBuf::from("processed_participants.csv"),
            parallel: false,
        }
    }
}

impl PipelineConfig {
    /// Load a TOML file; fields it omits keep their defaults.
    ///
    /// ```toml
    /// subjects = [2, 3, 4]
    /// window_duration = 60.0
    /// channels = ["EDA", "TEMP"]
    ///
    /// [sampling_rates]
    /// EDA = 4.0
    /// ```
    ///
    /// A partial `[sampling_rates]` table is merged over the default rates.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FeatureError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut cfg: PipelineConfig =
            toml::from_str(text).map_err(|e| FeatureError::Config(e.to_string()))?;
        let mut rates = PipelineConfig::default().sampling_rates;
        rates.append(&mut cfg.sampling_rates);
        cfg.sampling_rates = rates;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that cannot produce a meaningful run.
    ///
    /// Cutoffs above a channel's Nyquist frequency are not rejected here;
    /// they are a per-channel failure reported during the run.
    pub fn validate(&self) -> Result<()> {
        if !(self.window_duration > 0.0) {
            return Err(FeatureError::Config(format!(
                "window_duration must be positive, got {}",
                self.window_duration
            )));
        }
        if self.filter_order == 0 {
            return Err(FeatureError::Config("filter_order must be at least 1".into()));
        }
        if self.channels.is_empty() {
            return Err(FeatureError::Config("no channels selected".into()));
        }
        for (i, ch) in self.channels.iter().enumerate() {
            if self.channels[..i].contains(ch) {
                return Err(FeatureError::Config(format!("channel {ch} listed more than once")));
            }
        }
        for ch in &self.channels {
            match self.sampling_rates.get(ch) {
                Some(&fs) if fs > 0.0 => {}
                Some(&fs) => {
                    return Err(FeatureError::Config(format!(
                        "sampling rate for {ch} must be positive, got {fs}"
                    )))
                }
                None => {
                    return Err(FeatureError::Config(format!("no sampling rate for {ch}")))
                }
            }
        }
        Ok(())
    }

    /// Native sampling rate of `channel` in Hz.
    pub fn sampling_rate(&self, channel: Channel) -> Option<f64> {
        self.sampling_rates.get(&channel).copied()
    }

    /// Number of samples per window for `channel`.
    ///
    /// Computed as `floor(window_duration × rate)`. At the defaults this is
    /// **120** for EDA/TEMP and **1 920** for BVP.
    ///
    /// ```
    /// use wristfeat::{Channel, PipelineConfig};
    /// let cfg = PipelineConfig::default();
    /// assert_eq!(cfg.window_samples(Channel::Eda), Some(120));
    /// ```
    pub fn window_samples(&self, channel: Channel) -> Option<usize> {
        self.sampling_rate(channel)
            .map(|fs| (self.window_duration * fs) as usize)
    }

    /// `<data_dir>/S<n>/S<n>.safetensors`
    pub fn recording_path(&self, subject: u32) -> PathBuf {
        self.subject_dir(subject).join(format!("S{subject}.safetensors"))
    }

    /// `<data_dir>/S<n>/S<n>_readme.txt`
    pub fn readme_path(&self, subject: u32) -> PathBuf {
        self.subject_dir(subject).join(format!("S{subject}_readme.txt"))
    }

    fn subject_dir(&self, subject: u32) -> PathBuf {
        self.data_dir.join(format!("S{subject}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn bvp_window_is_1920_samples() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.window_samples(Channel::Bvp), Some(1920));
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let cfg = PipelineConfig::from_toml_str(
            r#"
            subjects = [4, 2]
            channels = ["TEMP"]
            [sampling_rates]
            TEMP = 8.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.subjects, vec![4, 2]);
        assert_eq!(cfg.channels, vec![Channel::Temp]);
        assert_eq!(cfg.sampling_rate(Channel::Temp), Some(8.0));
        assert_eq!(cfg.sampling_rate(Channel::Bvp), Some(64.0));
        assert_eq!(cfg.window_duration, 30.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PipelineConfig::from_toml_str("windw_duration = 5.0").is_err());
    }

    #[test]
    fn zero_window_rejected() {
        let cfg = PipelineConfig { window_duration: 0.0, ..PipelineConfig::default() };
        assert!(matches!(cfg.validate(), Err(FeatureError::Config(_))));
    }

    #[test]
    fn duplicate_channels_rejected() {
        let cfg = PipelineConfig {
            channels: vec![Channel::Eda, Channel::Bvp, Channel::Eda],
            ..PipelineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(FeatureError::Config(_))));
        assert!(PipelineConfig::from_toml_str(r#"channels = ["EDA", "eda"]"#).is_err());
    }

    #[test]
    fn subject_paths() {
        let cfg = PipelineConfig { data_dir: PathBuf::from("/data"), ..PipelineConfig::default() };
        assert_eq!(cfg.recording_path(7), PathBuf::from("/data/S7/S7.safetensors"));
        assert_eq!(cfg.readme_path(7), PathBuf::from("/data/S7/S7_readme.txt"));
    }
}
