use super::metrics::PassMetrics;
use crate::errors::ReportError;
use crate::prediction::Pass;
use csv::Writer;
use std::cmp::Ordering;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes one CSV row per pass into `dir/file_name`, ordered by start time.
/// Returns the path written.
pub fn write_visible_passes(passes: &[Pass], dir: &Path, file_name: &str) -> Result<PathBuf, ReportError> {
    let mut ordered: Vec<&Pass> = passes.iter().collect();
    ordered.sort_by(|a, b| a.start().partial_cmp(&b.start()).unwrap_or(Ordering::Equal));
    let rows = ordered
        .into_iter()
        .map(PassMetrics::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let mut writer = Writer::from_writer(File::create(&path)?);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(passes = rows.len(), path = %path.display(), "wrote pass report");
    Ok(path)
}
