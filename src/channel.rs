//! Wrist sensor channels.
//!
//! Every recording exposes at most these four streams under its `wrist`
//! group. Each has a fixed native sampling rate (see
//! [`PipelineConfig::sampling_rates`](crate::PipelineConfig::sampling_rates)).
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::FeatureError;

/// One wrist sensor modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    /// 3-axis accelerometer (motion).
    Acc,
    /// Blood volume pulse (optical pulse).
    Bvp,
    /// Electrodermal activity.
    Eda,
    /// Skin temperature.
    Temp,
}

impl Channel {
    /// All channels, in storage order.
    pub const ALL: [Channel; 4] = [Channel::Acc, Channel::Bvp, Channel::Eda, Channel::Temp];

    /// Name used both as the tensor suffix (`wrist/<name>`) and in the
    /// output table's `signal` column.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Acc => "ACC",
            Channel::Bvp => "BVP",
            Channel::Eda => "EDA",
            Channel::Temp => "TEMP",
        }
    }

    /// Tensor key inside a subject's recording file.
    pub fn tensor_key(self) -> String {
        format!("wrist/{}", self.name())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = FeatureError;

    /// Case-insensitive: `"eda"`, `"EDA"` and `" Eda "` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Channel::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FeatureError::Config(format!("unknown channel `{s}`")))
    }
}
