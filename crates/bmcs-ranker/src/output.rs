//! Prediction file: `citation_predictions_<YYYY-MM-DD>.txt`, one
//! `pmid|label|combined_score|journal_id` line per scored citation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::info;

use bmcs_common::Result;

use crate::fusion::PredictionRecord;

pub fn predictions_file_name(date: NaiveDate) -> String {
    format!("citation_predictions_{}.txt", date.format("%Y-%m-%d"))
}

/// Write records into `destination`, dated today. Returns the file path.
pub fn write_predictions(records: &[PredictionRecord], destination: &Path) -> Result<PathBuf> {
    write_predictions_dated(records, destination, Local::now().date_naive())
}

pub fn write_predictions_dated(
    records: &[PredictionRecord],
    destination: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    std::fs::create_dir_all(destination)?;
    let path = destination.join(predictions_file_name(date));
    let mut out = BufWriter::new(File::create(&path)?);
    for r in records {
        writeln!(
            out,
            "{}|{}|{}|{}",
            r.pmid,
            r.label.code(),
            r.combined_score,
            r.journal_id.as_deref().unwrap_or("")
        )?;
    }
    out.flush()?;
    info!(path = %path.display(), count = records.len(), "Predictions saved");
    Ok(path)
}
