//! In-memory model for tests and dry runs.

use std::collections::HashMap;

use crate::error::ModelError;
use crate::invoker::{validate_scores, ModelInput, ScoringModel};

/// Returns a fixed score per PMID; unknown PMIDs are an inference error.
pub struct MockScoringModel {
    name: String,
    scores: HashMap<u64, f64>,
}

impl MockScoringModel {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), scores: HashMap::new() }
    }

    pub fn with(mut self, pmid: u64, score: f64) -> Self {
        self.scores.insert(pmid, score);
        self
    }
}

impl ScoringModel for MockScoringModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &dyn ModelInput) -> Result<Vec<f64>, ModelError> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::voting::VotingFeatures;
    use bmcs_test_utils::CitationBuilder;

    #[test]
    fn test_mock_model() {
        let model = MockScoringModel::new("voting").with(1, 0.3).with(2, 0.8);
        let input = VotingFeatures::from_citations(&[
            CitationBuilder::new(2).build(),
            CitationBuilder::new(1).build(),
        ]);
        assert_eq!(model.predict(&input).unwrap(), vec![0.8, 0.3]);

        let unknown = VotingFeatures::from_citations(&[CitationBuilder::new(3).build()]);
        assert!(model.predict(&unknown).is_err());
    }
}
