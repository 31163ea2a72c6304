//! The output feature table.
//!
//! Rows are [`FeatureWindow`]s. The header is the union of the columns the
//! rows carry, in first-appearance order; an absent value is an empty cell.
//! The file is written to a temporary sibling and renamed into place, so the
//! destination either holds a complete table or is untouched.
use std::io::Write;
use std::path::Path;

use crate::channel::Channel;
use crate::demographics::Demographics;
use crate::error::{FeatureError, Result};
use crate::window::WindowStats;

/// One window of one channel of one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWindow {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub channel: Channel,
    pub subject: u32,
    pub demographics: Demographics,
}

impl FeatureWindow {
    /// Column names in output order.
    pub const COLUMNS: [&'static str; 11] = [
        "mean",
        "std",
        "min",
        "max",
        "signal",
        "subject",
        "age",
        "height_cm",
        "weight_kg",
        "gender",
        "dominant_hand",
    ];

    pub fn new(stats: WindowStats, channel: Channel, subject: u32, demographics: &Demographics) -> Self {
        Self {
            mean: stats.mean,
            std: stats.std,
            min: stats.min,
            max: stats.max,
            channel,
            subject,
            demographics: demographics.clone(),
        }
    }
}

/// A row that can be flattened into named, possibly-empty cells.
pub trait TableRow {
    fn cells(&self) -> Vec<(&'static str, Option<String>)>;
}

impl TableRow for FeatureWindow {
    fn cells(&self) -> Vec<(&'static str, Option<String>)> {
        let d = &self.demographics;
        let values = [
            Some(self.mean.to_string()),
            Some(self.std.to_string()),
            Some(self.min.to_string()),
            Some(self.max.to_string()),
            Some(self.channel.name().to_string()),
            Some(self.subject.to_string()),
            d.age.map(|v| v.to_string()),
            d.height_cm.map(|v| v.to_string()),
            d.weight_kg.map(|v| v.to_string()),
            d.gender.clone(),
            d.dominant_hand.clone(),
        ];
        Self::COLUMNS.into_iter().zip(values).collect()
    }
}

/// Union of the column names carried by `rows`, in first-appearance order.
pub fn header_union<R: TableRow>(rows: &[R]) -> Vec<&'static str> {
    let mut header: Vec<&'static str> = Vec::new();
    for row in rows {
        for (name, _) in row.cells() {
            if !header.contains(&name) {
                header.push(name);
            }
        }
    }
    header
}

/// Write `rows` as CSV to `out`. With no rows, `fallback_header` is written.
pub fn write_csv<R: TableRow, W: Write>(
    rows: &[R],
    fallback_header: &[&'static str],
    out: W,
) -> std::result::Result<(), csv::Error> {
    let mut header = header_union(rows);
    if header.is_empty() {
        header = fallback_header.to_vec();
    }

    let mut w = csv::Writer::from_writer(out);
    w.write_record(&header)?;
    for row in rows {
        let cells = row.cells();
        let record = header.iter().map(|col| {
            cells
                .iter()
                .find(|(name, _)| name == col)
                .and_then(|(_, v)| v.as_deref())
                .unwrap_or("")
        });
        w.write_record(record)?;
    }
    w.flush()?;
    Ok(())
}

/// Write the feature table to `path` atomically.
pub fn write_table(rows: &[FeatureWindow], path: &Path) -> Result<()> {
    let fail = |reason: String| FeatureError::OutputWrite { path: path.to_path_buf(), reason };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".wristfeat-")
        .suffix(".csv.tmp")
        .tempfile_in(dir)
        .map_err(|e| fail(format!("cannot create temporary file in {}: {e}", dir.display())))?;

    write_csv(rows, &FeatureWindow::COLUMNS, tmp.as_file_mut()).map_err(|e| fail(e.to_string()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| fail(e.to_string()))?;
    // On failure the temporary file is dropped and removed.
    tmp.persist(path).map_err(|e| fail(e.error.to_string()))?;
    Ok(())
}
