//! The seam between the pipeline and the pretrained models.
//!
//! Models are opaque: a batch goes in, one probability per citation comes
//! back in the same order. Backends differ only in how they get there.

use std::path::Path;

use tracing::info;

use crate::command::CommandModel;
use crate::error::ModelError;
use crate::score_table::ScoreTableModel;

/// A feature batch a model can consume.
pub trait ModelInput {
    /// Row identities, in batch order.
    fn pmids(&self) -> &[u64];

    /// JSON form handed to out-of-process runners.
    fn to_payload(&self) -> serde_json::Result<serde_json::Value>;
}

/// A pretrained classifier producing one score in [0, 1] per input row.
pub trait ScoringModel {
    fn name(&self) -> &str;

    fn predict(&self, input: &dyn ModelInput) -> Result<Vec<f64>, ModelError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Cnn,
    Voting,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Cnn    => "CNN",
            ModelKind::Voting => "voting",
        }
    }
}

/// How an artifact is turned into scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Spawn `runner` with the artifact path appended.
    Command { runner: Vec<String> },
    /// The artifact is a `pmid\tscore` table.
    ScoreTable,
}

/// Load a model, failing before any scoring if the artifact is unusable.
pub fn load_model(
    kind: ModelKind,
    source: &ModelSource,
    artifact: &Path,
) -> Result<Box<dyn ScoringModel>, ModelError> {
    let model: Box<dyn ScoringModel> = match source {
        ModelSource::Command { runner } => Box::new(CommandModel::load(kind.as_str(), runner, artifact)?),
        ModelSource::ScoreTable => Box::new(ScoreTableModel::load(kind.as_str(), artifact)?),
    };
    info!(model = kind.as_str(), artifact = %artifact.display(), "Model loaded");
    Ok(model)
}

/// Check a model's output against its input batch.
pub fn validate_scores(model: &str, expected: usize, scores: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    if scores.len() != expected {
        return Err(ModelError::inference(
            model,
            format!("expected {expected} scores, got {}", scores.len()),
        ));
    }
    if let Some((i, s)) = scores
        .iter()
        .enumerate()
        .find(|(_, s)| !s.is_finite() || !(0.0..=1.0).contains(*s))
    {
        return Err(ModelError::inference(model, format!("score {s} at row {i} is outside [0, 1]")));
    }
    Ok(scores)
}
