//! Cumulative results file. Each run appends a block: a blank separator,
//! the run settings as `name: value`, then the eight metrics.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use bmcs_common::{PolicyFlags, Result};

use crate::harness::EvaluationMetrics;
use crate::reference::Dataset;

pub const REPORT_FILE: &str = "bmcs_test_results.txt";

pub fn append_report(
    destination: &Path,
    dataset: Dataset,
    flags: &PolicyFlags,
    tolerance: f64,
    metrics: &EvaluationMetrics,
) -> Result<PathBuf> {
    std::fs::create_dir_all(destination)?;
    let path = destination.join(REPORT_FILE);

    let mut block = String::from("\n\n");
    block.push_str(&format!("dataset: {}\n", dataset.as_str()));
    for (name, value) in flags.entries() {
        block.push_str(&format!("{name}: {value}\n"));
    }
    block.push_str(&format!("tolerance: {tolerance}\n"));
    for (name, value) in metrics.entries() {
        block.push_str(&format!("{name}: {value}\n"));
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    file.write_all(block.as_bytes())?;
    info!(path = %path.display(), "Evaluation results appended");
    Ok(path)
}
