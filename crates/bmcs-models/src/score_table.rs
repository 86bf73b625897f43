//! Precomputed scores: the artifact is a `pmid\tscore` table written offline
//! by the model runtime. Lines starting with `#` are comments.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ModelError;
use crate::invoker::{validate_scores, ModelInput, ScoringModel};

#[derive(Debug, Clone)]
pub struct ScoreTableModel {
    name: String,
    scores: HashMap<u64, f64>,
}

impl ScoreTableModel {
    pub fn load(name: &str, path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModelError::unavailable(name, format!("cannot read {}: {e}", path.display()))
        })?;
        let model = Self::parse(name, &content)?;
        debug!(model = name, entries = model.scores.len(), "Score table loaded");
        Ok(model)
    }

    pub fn parse(name: &str, content: &str) -> Result<Self, ModelError> {
        let mut scores = HashMap::new();
        for (n, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let bad = |what: &str| ModelError::unavailable(name, format!("line {}: {what}: {line:?}", n + 1));
            let (pmid, score) = line.split_once('\t').ok_or_else(|| bad("expected pmid\\tscore"))?;
            let pmid = pmid.trim().parse::<u64>().map_err(|_| bad("bad pmid"))?;
            let score = score.trim().parse::<f64>().map_err(|_| bad("bad score"))?;
            scores.insert(pmid, score);
        }
        Ok(Self { name: name.to_string(), scores })
    }
}

impl ScoringModel for ScoreTableModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &dyn ModelInput) -> Result<Vec<f64>, ModelError> {
        info!("Making {} predictions", self.name);
        let scores = input
            .pmids()
            .iter()
            .map(|pmid| {
                self.scores
                    .get(pmid)
                    .copied()
                    .ok_or_else(|| ModelError::inference(&self.name, format!("no score for PMID {pmid}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        validate_scores(&self.name, input.pmids().len(), scores)
    }
}
