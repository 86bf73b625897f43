//! Decision cutoffs for the combined score and for each model on its own.
//!
//! The combined score is the product of two model outputs, so it is not a
//! calibrated probability: the combined cutoffs are tuned against the product
//! directly and are separate from the standalone model cutoffs.

use serde::{Deserialize, Serialize};

use crate::error::{BmcsError, Result};
use crate::journals::JournalGroup;

/// Single comparison used at every cutoff: a score must strictly exceed it.
/// A score exactly equal to a cutoff falls below it.
#[inline]
pub fn exceeds(score: f64, cutoff: f64) -> bool {
    score > cutoff
}

/// A global cutoff plus the lower per-group cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupCutoffs {
    pub global: f64,
    pub science: f64,
    pub jurisprudence: f64,
}

impl GroupCutoffs {
    pub fn for_group(&self, group: JournalGroup) -> f64 {
        match group {
            JournalGroup::Science       => self.science,
            JournalGroup::Jurisprudence => self.jurisprudence,
            JournalGroup::Other         => self.global,
        }
    }

    /// Cutoff for a journal group, or the global cutoff when group
    /// thresholds are disabled.
    pub fn select(&self, group: JournalGroup, group_thresh: bool) -> f64 {
        if group_thresh {
            self.for_group(group)
        } else {
            self.global
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        for (label, v) in [("global", self.global), ("science", self.science), ("jurisprudence", self.jurisprudence)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(BmcsError::Config(format!("{name}.{label} cutoff {v} is outside [0, 1]")));
            }
        }
        if self.science >= self.global || self.jurisprudence >= self.global {
            return Err(BmcsError::Config(format!(
                "{name}: group cutoffs ({}, {}) must be lower than the global cutoff {}",
                self.science, self.jurisprudence, self.global
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Cutoffs on the combined score separating out-of-scope from review.
    pub combined: GroupCutoffs,
    /// Combined score above which a citation is accepted without review.
    pub precision: f64,
    /// Standalone voting-ensemble cutoffs (evaluation only).
    pub voting: GroupCutoffs,
    /// Standalone CNN cutoffs (evaluation only).
    pub cnn: GroupCutoffs,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            combined: GroupCutoffs { global: 0.25, science: 0.0036, jurisprudence: 0.075 },
            precision: 0.5,
            voting:   GroupCutoffs { global: 0.5, science: 0.075, jurisprudence: 0.185 },
            cnn:      GroupCutoffs { global: 0.5, science: 0.15,  jurisprudence: 0.45 },
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<()> {
        self.combined.validate("combined")?;
        self.voting.validate("voting")?;
        self.cnn.validate("cnn")?;
        if !(0.0..=1.0).contains(&self.precision) || self.precision <= self.combined.global {
            return Err(BmcsError::Config(format!(
                "precision cutoff {} must lie in [0, 1] above the combined cutoff {}",
                self.precision, self.combined.global
            )));
        }
        Ok(())
    }
}
