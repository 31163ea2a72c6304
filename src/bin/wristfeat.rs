use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use wristfeat::{logging, Channel, DatasetAggregator, PipelineConfig};

#[derive(Parser)]
#[command(name = "wristfeat", about = "Windowed wrist-sensor features → one CSV table")]
struct Args {
    /// TOML config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root directory holding S<n>/ subject folders
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output CSV path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Subject identifiers (comma-separated), in output order
    #[arg(long, value_delimiter = ',')]
    subjects: Option<Vec<u32>>,

    /// Channels to featurize (comma-separated, e.g. EDA,BVP,TEMP)
    #[arg(long, value_delimiter = ',')]
    channels: Option<Vec<Channel>>,

    /// Window duration in seconds
    #[arg(long)]
    window: Option<f64>,

    /// Lowpass cutoff in Hz
    #[arg(long)]
    cutoff: Option<f64>,

    /// Butterworth order
    #[arg(long)]
    order: Option<usize>,

    /// Process subjects in parallel
    #[arg(long)]
    parallel: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    let mut cfg = match &args.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(v) = args.data_dir { cfg.data_dir = v; }
    if let Some(v) = args.output { cfg.output = v; }
    if let Some(v) = args.subjects { cfg.subjects = v; }
    if let Some(v) = args.channels { cfg.channels = v; }
    if let Some(v) = args.window { cfg.window_duration = v; }
    if let Some(v) = args.cutoff { cfg.filter_cutoff = v; }
    if let Some(v) = args.order { cfg.filter_order = v; }
    cfg.parallel |= args.parallel;

    let aggregator = DatasetAggregator::new(cfg).context("invalid configuration")?;
    let summary = aggregator.run()?;
    print!("{summary}");
    println!("Output saved to {}", aggregator.config().output.display());

    Ok(())
}
