//! Labelled citation datasets for evaluation runs.
//!
//! A dataset is a JSON array of citation objects carrying an `is_indexed`
//! ground-truth label, optionally gzip-compressed (`.gz` suffix).
//! Datasets are pre-filtered; the only filter applied here is the
//! misindexed-journal drop.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, instrument};

use bmcs_common::{Citation, JournalTables, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledCitation {
    #[serde(flatten)]
    pub citation: Citation,
    #[serde(deserialize_with = "bool_or_int")]
    pub is_indexed: bool,
}

fn bool_or_int<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }
    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(serde::de::Error::custom(format!("is_indexed must be 0 or 1, got {n}"))),
    }
}

#[instrument]
pub fn load_labelled_dataset(path: &Path) -> Result<Vec<LabelledCitation>> {
    let file = BufReader::new(File::open(path)?);
    let mut reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let citations: Vec<LabelledCitation> = serde_json::from_str(&content)?;
    info!(count = citations.len(), "Loaded labelled dataset");
    Ok(citations)
}

/// Remove citations from historically misindexed journals.
pub fn drop_misindexed(
    citations: Vec<LabelledCitation>,
    tables: &JournalTables,
) -> Vec<LabelledCitation> {
    let before = citations.len();
    let kept: Vec<_> = citations
        .into_iter()
        .filter(|c| !tables.is_misindexed(c.citation.journal_id()))
        .collect();
    info!(dropped = before - kept.len(), "Dropped misindexed journals from dataset");
    kept
}
