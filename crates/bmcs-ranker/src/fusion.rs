//! Decision fusion: two model scores in, one `ScopeLabel` out.
//!
//! Stages run in a fixed order, each a pure function of its inputs:
//! 1. threshold the combined score (global or journal-group cutoff)
//! 2. optionally force `SpecialReview` for flagged publication types
//! 3. force `AutoInScope` above the precision cutoff
//!
//! Stage 3 always runs last and wins over stage 2.

use serde::Serialize;
use tracing::{debug, info, instrument};

use bmcs_common::{exceeds, BmcsError, Citation, JournalTables, PolicyFlags, Result, ThresholdConfig};

use crate::label::ScopeLabel;
use crate::pub_type::is_flagged_publication;

/// One fused result, in batch order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub pmid: u64,
    pub journal_id: Option<String>,
    pub voting_score: f64,
    pub cnn_score: f64,
    pub combined_score: f64,
    pub label: ScopeLabel,
}

/// Pointwise product of the two model outputs.
pub fn combine_scores(voting: &[f64], cnn: &[f64]) -> Result<Vec<f64>> {
    if voting.len() != cnn.len() {
        return Err(BmcsError::ModelInference {
            model: "combined".to_string(),
            reason: format!("voting produced {} scores, CNN produced {}", voting.len(), cnn.len()),
        });
    }
    Ok(voting.iter().zip(cnn).map(|(v, c)| v * c).collect())
}

pub struct DecisionEngine<'a> {
    thresholds: &'a ThresholdConfig,
    tables: &'a JournalTables,
}

impl<'a> DecisionEngine<'a> {
    pub fn new(thresholds: &'a ThresholdConfig, tables: &'a JournalTables) -> Self {
        Self { thresholds, tables }
    }

    /// Stage 1: `NeedsReview` above the cutoff, `OutOfScope` otherwise.
    pub fn threshold(
        &self,
        combined: &[f64],
        journal_ids: &[Option<&str>],
        group_thresh: bool,
    ) -> Vec<ScopeLabel> {
        combined
            .iter()
            .zip(journal_ids)
            .map(|(&score, &journal)| {
                let group = self.tables.group_of(journal);
                let cutoff = self.thresholds.combined.select(group, group_thresh);
                if exceeds(score, cutoff) {
                    ScopeLabel::NeedsReview
                } else {
                    ScopeLabel::OutOfScope
                }
            })
            .collect()
    }

    /// Stage 2: flagged titles or publication types become `SpecialReview`.
    pub fn apply_pub_type_override(labels: &mut [ScopeLabel], citations: &[Citation]) {
        for (label, citation) in labels.iter_mut().zip(citations) {
            if is_flagged_publication(citation) {
                debug!(pmid = citation.pmid, "Publication type marked for special review");
                *label = ScopeLabel::SpecialReview;
            }
        }
    }

    /// Stage 3: scores above the precision cutoff skip review entirely.
    pub fn apply_auto_accept(&self, labels: &mut [ScopeLabel], combined: &[f64]) {
        for (label, &score) in labels.iter_mut().zip(combined) {
            if exceeds(score, self.thresholds.precision) {
                *label = ScopeLabel::AutoInScope;
            }
        }
    }

    /// Run all stages over a scored batch.
    #[instrument(skip_all, fields(batch = citations.len()))]
    pub fn decide(
        &self,
        citations: &[Citation],
        voting: &[f64],
        cnn: &[f64],
        flags: &PolicyFlags,
    ) -> Result<Vec<PredictionRecord>> {
        if voting.len() != citations.len() {
            return Err(BmcsError::ModelInference {
                model: "voting".to_string(),
                reason: format!("{} scores for {} citations", voting.len(), citations.len()),
            });
        }
        let combined = combine_scores(voting, cnn)?;

        info!("Combining predictions");
        let journals: Vec<Option<&str>> = citations.iter().map(Citation::journal_id).collect();
        let mut labels = self.threshold(&combined, &journals, flags.group_thresh);

        if flags.pub_type_filter {
            info!("Marking specified Publication Types");
            Self::apply_pub_type_override(&mut labels, citations);
        }
        self.apply_auto_accept(&mut labels, &combined);

        Ok(citations
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (c, label))| PredictionRecord {
                pmid: c.pmid,
                journal_id: c.journal_id.clone(),
                voting_score: voting[i],
                cnn_score: cnn[i],
                combined_score: combined[i],
                label,
            })
            .collect())
    }
}
