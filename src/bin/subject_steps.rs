/// subject_steps: load one subject, run each feature step on one channel, and
/// write every intermediate array to a safetensors file for comparison
/// against a reference implementation.
///
/// Output keys:
///   raw          [T]        f64  flattened channel samples
///   filtered     [T]        f64  after causal Butterworth lowpass
///   sos          [S, 6]     f64  filter sections (b0 b1 b2 1 a1 a2)
///   windows      [E, 4]     f64  per-window mean, std, min, max
///   n_windows    [1]        i32
///   window_size  [1]        i32
use anyhow::{bail, Context, Result};
use clap::Parser;
use ndarray::Array2;
use std::path::PathBuf;

use wristfeat::{
    filter::{butter_lowpass, sosfilt},
    io::{RawRecording, StWriter},
    window::{featurize, window_size},
    Channel, PipelineConfig,
};

#[derive(Parser, Debug)]
#[command(name = "subject_steps")]
struct Args {
    /// Root directory holding S<n>/ subject folders.
    #[arg(long)]
    data_dir: PathBuf,

    /// Subject identifier.
    #[arg(long)]
    subject: u32,

    /// Channel to trace.
    #[arg(long, default_value = "EDA")]
    channel: Channel,

    /// Output safetensors path.
    #[arg(long)]
    output: PathBuf,

    /// Lowpass cutoff (Hz).
    #[arg(long, default_value_t = 1.0)]
    cutoff: f64,

    /// Butterworth order.
    #[arg(long, default_value_t = 4)]
    order: usize,

    /// Window duration (s).
    #[arg(long, default_value_t = 30.0)]
    window: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = PipelineConfig { data_dir: args.data_dir.clone(), ..PipelineConfig::default() };
    let Some(sfreq) = cfg.sampling_rate(args.channel) else {
        bail!("no sampling rate known for {}", args.channel);
    };

    // ── 1. Load ────────────────────────────────────────────────────────────
    let t_load = now();
    let path = cfg.recording_path(args.subject);
    let rec = RawRecording::load(&path).with_context(|| format!("loading {}", path.display()))?;
    let raw = rec
        .flattened(args.channel)
        .with_context(|| format!("{} not present in {}", args.channel, path.display()))?;
    let ms_load = t_load.elapsed().as_secs_f64() * 1000.0;

    // ── 2. Lowpass ─────────────────────────────────────────────────────────
    let t_lp = now();
    let sos = butter_lowpass(args.order, args.cutoff, sfreq)?;
    let filtered = sosfilt(&sos, raw.view());
    let ms_lp = t_lp.elapsed().as_secs_f64() * 1000.0;

    // ── 3. Windows ─────────────────────────────────────────────────────────
    let t_win = now();
    let n_win = window_size(sfreq, args.window);
    let windows = featurize(filtered.view(), n_win);
    let ms_win = t_win.elapsed().as_secs_f64() * 1000.0;

    eprintln!("TIMING load={ms_load:.4}ms lowpass={ms_lp:.4}ms windows={ms_win:.4}ms");
    eprintln!(
        "  S{} {}  {} samples @ {sfreq} Hz  {} windows of {n_win}",
        args.subject,
        args.channel,
        raw.len(),
        windows.len()
    );

    // ── 4. Write output ────────────────────────────────────────────────────
    eprintln!("Writing → {}", args.output.display());
    let mut w = StWriter::new();
    w.add_f64("raw", &raw.to_vec(), &[raw.len()]);
    w.add_f64("filtered", &filtered.to_vec(), &[filtered.len()]);

    let sos_arr = Array2::from_shape_fn((sos.len(), 6), |(i, j)| {
        if j < 3 { sos[i].b[j] } else { sos[i].a[j - 3] }
    });
    w.add_f64_arr2("sos", &sos_arr);

    let win_arr = Array2::from_shape_fn((windows.len(), 4), |(i, j)| {
        let s = &windows[i];
        [s.mean, s.std, s.min, s.max][j]
    });
    w.add_f64_arr2("windows", &win_arr);
    w.add_i32("n_windows", &[windows.len() as i32], &[1]);
    w.add_i32("window_size", &[n_win as i32], &[1]);
    w.write(&args.output)?;

    eprintln!("Done.");
    Ok(())
}

/// Return `std::time::Instant::now()` (used for internal timing).
#[inline(always)]
fn now() -> std::time::Instant { std::time::Instant::now() }
