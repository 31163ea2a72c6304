/// Shared helpers: synthetic subject stores on disk.
use std::path::{Path, PathBuf};
use wristfeat::{io::StWriter, Channel, PipelineConfig};

#[allow(unused)]
pub const README_S2: &str = "\
### Personal information ###
Age: 27
Height (cm): 175
Weight (kg): 80
Gender: male
Dominant hand: right
";

/// Samples for one channel: `n` rows of `cols` values.
#[allow(unused)]
pub fn channel_data(n: usize, cols: usize, sfreq: f64) -> Vec<f64> {
    (0..n * cols)
        .map(|i| {
            let t = (i / cols) as f64 / sfreq;
            1.0 + 0.5 * (2.0 * std::f64::consts::PI * 0.05 * t).sin()
        })
        .collect()
}

#[allow(unused)]
/// Write `S<n>/S<n>.safetensors` (and the readme, if given) under `root`.
///
/// `channels` lists `(channel, n_samples)`; ACC gets 3 columns.
pub fn write_subject(root: &Path, subject: u32, channels: &[(Channel, usize)], readme: Option<&str>) -> PathBuf {
    let cfg = PipelineConfig { data_dir: root.to_path_buf(), ..PipelineConfig::default() };
    let dir = root.join(format!("S{subject}"));
    std::fs::create_dir_all(&dir).unwrap();

    let mut w = StWriter::new();
    for &(ch, n) in channels {
        let cols = if ch == Channel::Acc { 3 } else { 1 };
        let fs = cfg.sampling_rate(ch).unwrap();
        w.add_f64(&ch.tensor_key(), &channel_data(n, cols, fs), &[n, cols]);
    }
    // Chest data sits alongside and must be ignored.
    w.add_f32("chest/ECG", &[0.0; 8], &[8]);
    let path = cfg.recording_path(subject);
    w.write(&path).unwrap();

    if let Some(text) = readme {
        std::fs::write(cfg.readme_path(subject), text).unwrap();
    }
    path
}

/// Config rooted at `root`, writing `root/out.csv`.
#[allow(unused)]
pub fn config(root: &Path, subjects: Vec<u32>) -> PipelineConfig {
    PipelineConfig {
        data_dir: root.to_path_buf(),
        output: root.join("out.csv"),
        subjects,
        ..PipelineConfig::default()
    }
}

/// Read a CSV into (header, rows).
#[allow(unused)]
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut r = csv::Reader::from_path(path).unwrap();
    let header = r.headers().unwrap().iter().map(String::from).collect();
    let rows = r
        .records()
        .map(|rec| rec.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}
