//! Multi-subject aggregation.
//!
//! [`DatasetAggregator`] runs [`SubjectPipeline`] over the roster, keeps rows
//! in roster order, and writes the single output table. A subject whose
//! recording cannot be loaded is logged and skipped; the rest of the run is
//! unaffected.
use rayon::prelude::*;
use std::fmt;
use tracing::{info, warn};

use crate::channel::Channel;
use crate::config::PipelineConfig;
use crate::error::{FeatureError, Result};
use crate::subject::{ChannelOutcome, SubjectFeatures, SubjectPipeline};
use crate::table::{write_table, FeatureWindow};

/// The full output table, in roster → channel → window order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<FeatureWindow>,
}

/// Counts and reasons for everything that did or did not contribute rows.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Subjects whose recording loaded (even if they produced no rows).
    pub subjects_processed: usize,
    /// Subjects that contributed at least one row.
    pub subjects_with_rows: usize,
    /// `(subject, reason)` for each subject dropped entirely.
    pub subjects_skipped: Vec<(u32, String)>,
    /// `(subject, channel)` pairs that produced at least one window.
    pub channels_contributed: usize,
    /// `(subject, channel, reason)` for channels that produced no rows.
    pub channels_skipped: Vec<(u32, Channel, String)>,
    /// Malformed demographic fields across all subjects.
    pub demographic_errors: usize,
    pub rows: usize,
}

impl RunSummary {
    fn record_subject(&mut self, s: &SubjectFeatures) {
        self.subjects_processed += 1;
        if !s.rows.is_empty() {
            self.subjects_with_rows += 1;
        }
        self.demographic_errors += s.demographic_errors;
        self.rows += s.rows.len();
        for (channel, outcome) in &s.channels {
            match outcome {
                ChannelOutcome::Featurized { windows } if *windows > 0 => {
                    self.channels_contributed += 1
                }
                ChannelOutcome::Featurized { .. } => self.channels_skipped.push((
                    s.subject,
                    *channel,
                    "signal shorter than one window".into(),
                )),
                ChannelOutcome::Absent => self.channels_skipped.push((
                    s.subject,
                    *channel,
                    "channel absent from recording".into(),
                )),
                ChannelOutcome::Failed { reason } => {
                    self.channels_skipped.push((s.subject, *channel, reason.clone()))
                }
            }
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} rows from {} subject(s) ({} loaded, {} skipped); {} channel(s) contributed, {} skipped",
            self.rows,
            self.subjects_with_rows,
            self.subjects_processed,
            self.subjects_skipped.len(),
            self.channels_contributed,
            self.channels_skipped.len(),
        )?;
        for (subject, reason) in &self.subjects_skipped {
            writeln!(f, "  skipped subject {subject}: {reason}")?;
        }
        for (subject, channel, reason) in &self.channels_skipped {
            writeln!(f, "  skipped subject {subject} {channel}: {reason}")?;
        }
        if self.demographic_errors > 0 {
            writeln!(f, "  {} malformed demographic field(s) left empty", self.demographic_errors)?;
        }
        Ok(())
    }
}

/// Drives a whole run from an explicit configuration.
pub struct DatasetAggregator {
    cfg: PipelineConfig,
}

impl DatasetAggregator {
    /// Validates `cfg` up front so bad settings fail before any I/O.
    pub fn new(cfg: PipelineConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Process every subject and return the table plus a summary. Nothing is
    /// written.
    pub fn collect(&self) -> (Dataset, RunSummary) {
        let pipeline = SubjectPipeline::new(&self.cfg);
        let total = self.cfg.subjects.len();

        let run_one = |(i, &subject): (usize, &u32)| {
            info!("Processing subject {subject} ({}/{total})...", i + 1);
            pipeline.run(subject)
        };

        // Indexed parallel collect keeps roster order.
        let results: Vec<Result<SubjectFeatures>> = if self.cfg.parallel {
            self.cfg.subjects.par_iter().enumerate().map(run_one).collect()
        } else {
            self.cfg.subjects.iter().enumerate().map(run_one).collect()
        };

        let mut dataset = Dataset::default();
        let mut summary = RunSummary::default();
        for (&subject, result) in self.cfg.subjects.iter().zip(results) {
            match result {
                Ok(features) => {
                    summary.record_subject(&features);
                    dataset.rows.extend(features.rows);
                }
                Err(e) => {
                    warn!(subject, "{e}; subject skipped");
                    let reason = match &e {
                        FeatureError::SubjectLoad { source, .. } => source.to_string(),
                        other => other.to_string(),
                    };
                    summary.subjects_skipped.push((subject, reason));
                }
            }
        }
        (dataset, summary)
    }

    /// Process every subject and write the table to the configured output.
    ///
    /// Only an output failure aborts the run.
    pub fn run(&self) -> Result<RunSummary> {
        let (dataset, summary) = self.collect();
        write_table(&dataset.rows, &self.cfg.output)?;
        info!(
            "Data processing complete. {} rows written to {}",
            summary.rows,
            self.cfg.output.display()
        );
        Ok(summary)
    }
}
