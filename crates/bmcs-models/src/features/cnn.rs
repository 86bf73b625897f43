//! Index-encoded batch for the CNN.
//!
//! Text is lower-cased, split into words and punctuation, mapped through the
//! word index and post-padded / post-truncated. Years become cumulative
//! time-period vectors: position `i` is 1 when `i <= year - first_year`.

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use bmcs_common::{BmcsError, Citation, Result};

use crate::invoker::ModelInput;

pub const TITLE_MAX_WORDS: usize = 64;
pub const ABSTRACT_MAX_WORDS: usize = 448;
pub const MIN_PUB_YEAR: i32 = 1809;
pub const MIN_YEAR_COMPLETED: i32 = 1965;
pub const MODEL_MAX_YEAR: i32 = 2018;
pub const UNKNOWN_JOURNAL_INDEX: u32 = 0;
pub const UNKNOWN_WORD_INDEX: u32 = 1;
pub const PADDING_INDEX: u32 = 0;

lazy_static! {
    // Word runs (with inner hyphens/apostrophes) or single punctuation marks.
    static ref TOKEN: Regex = Regex::new(r"\w+(?:[-']\w+)*|[^\w\s]").unwrap();
}

/// Value-to-index table read from `<index>\t<value>` lines.
#[derive(Debug, Clone, Default)]
pub struct IndexLookup {
    indices: HashMap<String, u32>,
}

impl IndexLookup {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BmcsError::Config(format!("cannot read index file {}: {e}", path.display()))
        })?;
        let lookup = Self::parse(&content)
            .map_err(|reason| BmcsError::Config(format!("{}: {reason}", path.display())))?;
        debug!(path = %path.display(), entries = lookup.len(), "Index lookup loaded");
        Ok(lookup)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut indices = HashMap::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (id, value) = line
                .split_once('\t')
                .ok_or_else(|| format!("line {}: expected <index>\\t<value>", n + 1))?;
            let id = id
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("line {}: bad index {id:?}: {e}", n + 1))?;
            indices.insert(value.trim().to_string(), id);
        }
        Ok(Self { indices })
    }

    pub fn get(&self, value: &str) -> Option<u32> {
        self.indices.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CnnBatch {
    pub pmids: Vec<u64>,
    pub title_input: Vec<Vec<u32>>,
    pub abstract_input: Vec<Vec<u32>>,
    pub pub_year_input: Vec<Vec<u8>>,
    pub year_completed_input: Vec<Vec<u8>>,
    pub journal_input: Vec<u32>,
}

impl ModelInput for CnnBatch {
    fn pmids(&self) -> &[u64] {
        &self.pmids
    }

    fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

pub struct CnnFeatureBuilder {
    words: IndexLookup,
    journals: IndexLookup,
}

impl CnnFeatureBuilder {
    pub fn new(words: IndexLookup, journals: IndexLookup) -> Self {
        Self { words, journals }
    }

    pub fn load(word_indices: &Path, journal_ids: &Path) -> Result<Self> {
        Ok(Self::new(IndexLookup::load(word_indices)?, IndexLookup::load(journal_ids)?))
    }

    pub fn build(&self, citations: &[Citation]) -> CnnBatch {
        let pub_year_periods = (1 + MODEL_MAX_YEAR - MIN_PUB_YEAR) as usize;
        let completed_periods = (1 + MODEL_MAX_YEAR - MIN_YEAR_COMPLETED) as usize;
        let completed = time_periods(MODEL_MAX_YEAR - MIN_YEAR_COMPLETED, completed_periods);

        let mut batch = CnnBatch {
            pmids: Vec::with_capacity(citations.len()),
            title_input: Vec::with_capacity(citations.len()),
            abstract_input: Vec::with_capacity(citations.len()),
            pub_year_input: Vec::with_capacity(citations.len()),
            year_completed_input: Vec::with_capacity(citations.len()),
            journal_input: Vec::with_capacity(citations.len()),
        };
        for c in citations {
            let year = c.pub_year.unwrap_or(MODEL_MAX_YEAR).clamp(MIN_PUB_YEAR, MODEL_MAX_YEAR);
            batch.pmids.push(c.pmid);
            batch.title_input.push(self.vectorize(&c.title, TITLE_MAX_WORDS));
            batch.abstract_input.push(self.vectorize(&c.abstract_text, ABSTRACT_MAX_WORDS));
            batch.pub_year_input.push(time_periods(year - MIN_PUB_YEAR, pub_year_periods));
            batch.year_completed_input.push(completed.clone());
            batch.journal_input.push(
                c.journal_id()
                    .and_then(|id| self.journals.get(id))
                    .unwrap_or(UNKNOWN_JOURNAL_INDEX),
            );
        }
        batch
    }

    fn vectorize(&self, text: &str, max_words: usize) -> Vec<u32> {
        let lowered = text.to_lowercase();
        let mut indices: Vec<u32> = tokenize(&lowered)
            .take(max_words)
            .map(|w| self.words.get(w).unwrap_or(UNKNOWN_WORD_INDEX))
            .collect();
        indices.resize(max_words, PADDING_INDEX);
        indices
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    TOKEN.find_iter(text).map(|m| m.as_str())
}

fn time_periods(index: i32, periods: usize) -> Vec<u8> {
    (0..periods).map(|i| u8::from(i as i32 <= index)).collect()
}
