//! Metrics for one replay of the fusion pipeline over a labelled dataset.
//!
//! Two readings of the fused label are scored:
//! - in scope: `AutoInScope` or `NeedsReview`
//! - in scope without review: `AutoInScope` only

use serde::Serialize;
use tracing::{info, instrument};

use bmcs_common::{exceeds, BmcsError, GroupCutoffs, JournalTables, Result, ThresholdConfig};
use bmcs_ranker::{PredictionRecord, ScopeLabel};

use crate::metrics::BinaryConfusion;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    pub bmcs_recall: f64,
    pub bmcs_precision: f64,
    pub voting_recall: f64,
    pub voting_precision: f64,
    pub cnn_recall: f64,
    pub cnn_precision: f64,
    pub in_scope_recall: f64,
    pub in_scope_precision: f64,
}

impl EvaluationMetrics {
    /// `(report name, value)` in report order.
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("BmCS recall", self.bmcs_recall),
            ("BmCS precision", self.bmcs_precision),
            ("Voting recall", self.voting_recall),
            ("Voting precision", self.voting_precision),
            ("CNN recall", self.cnn_recall),
            ("CNN precision", self.cnn_precision),
            ("BmCS in-scope recall", self.in_scope_recall),
            ("BmCS in-scope precision", self.in_scope_precision),
        ]
    }
}

/// Each model on its own, thresholded at its own cutoffs.
/// Returns `(voting, cnn)` confusion counts.
pub fn evaluate_individual_models(
    records: &[PredictionRecord],
    labels: &[bool],
    thresholds: &ThresholdConfig,
    tables: &JournalTables,
    group_thresh: bool,
) -> (BinaryConfusion, BinaryConfusion) {
    let standalone = |cutoffs: &GroupCutoffs, score: fn(&PredictionRecord) -> f64| {
        BinaryConfusion::from_pairs(records.iter().zip(labels).map(|(r, &actual)| {
            let group = tables.group_of(r.journal_id.as_deref());
            (actual, exceeds(score(r), cutoffs.select(group, group_thresh)))
        }))
    };
    (
        standalone(&thresholds.voting, |r| r.voting_score),
        standalone(&thresholds.cnn, |r| r.cnn_score),
    )
}

#[instrument(skip_all, fields(citations = records.len()))]
pub fn evaluate(
    records: &[PredictionRecord],
    labels: &[bool],
    thresholds: &ThresholdConfig,
    tables: &JournalTables,
    group_thresh: bool,
) -> Result<EvaluationMetrics> {
    if records.len() != labels.len() {
        return Err(BmcsError::malformed(
            "dataset",
            format!("{} predictions for {} labelled citations", records.len(), labels.len()),
        ));
    }

    let in_scope = BinaryConfusion::from_pairs(
        records.iter().zip(labels).map(|(r, &actual)| (actual, r.label.is_in_scope())),
    );
    let auto = BinaryConfusion::from_pairs(
        records
            .iter()
            .zip(labels)
            .map(|(r, &actual)| (actual, r.label == ScopeLabel::AutoInScope)),
    );
    let (voting, cnn) = evaluate_individual_models(records, labels, thresholds, tables, group_thresh);

    let metrics = EvaluationMetrics {
        bmcs_recall: in_scope.recall(),
        bmcs_precision: in_scope.precision(),
        voting_recall: voting.recall(),
        voting_precision: voting.precision(),
        cnn_recall: cnn.recall(),
        cnn_precision: cnn.precision(),
        in_scope_recall: auto.recall(),
        in_scope_precision: auto.precision(),
    };
    info!(
        recall = metrics.bmcs_recall,
        precision = metrics.bmcs_precision,
        in_scope_recall = metrics.in_scope_recall,
        in_scope_precision = metrics.in_scope_precision,
        "Evaluation complete"
    );
    Ok(metrics)
}
