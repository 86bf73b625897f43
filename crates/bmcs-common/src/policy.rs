//! Caller-supplied policy flags.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFlags {
    /// Score every citation regardless of status or journal.
    pub predict_all: bool,
    /// Score MEDLINE citations from journals that are not selectively indexed.
    pub predict_medline: bool,
    /// Skip journals with a history of misindexing.
    pub journal_drop: bool,
    /// Use science/jurisprudence cutoffs instead of the global one.
    pub group_thresh: bool,
    /// Route flagged publication types to special review.
    pub pub_type_filter: bool,
}

impl Default for PolicyFlags {
    fn default() -> Self {
        Self {
            predict_all: true,
            predict_medline: false,
            journal_drop: false,
            group_thresh: false,
            pub_type_filter: false,
        }
    }
}

impl PolicyFlags {
    /// `(name, value)` pairs in a stable order, for reports.
    pub fn entries(&self) -> [(&'static str, bool); 5] {
        [
            ("predict_all", self.predict_all),
            ("predict_medline", self.predict_medline),
            ("journal_drop", self.journal_drop),
            ("group_thresh", self.group_thresh),
            ("pub_type_filter", self.pub_type_filter),
        ]
    }
}

/// Which kind of run the binary performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Production,
    Validation,
    Test,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Production => "production",
            RunMode::Validation => "validation",
            RunMode::Test       => "test",
        }
    }
}
