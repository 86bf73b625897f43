//! One linear pass per batch:
//! parse → filter → features → models → fusion → prediction file,
//! or, for evaluation, dataset → features → models → fusion → metrics.
//!
//! Every resource is loaded before the first citation is scored; any failure
//! stops the batch.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use bmcs_common::{Citation, JournalTables, PolicyFlags, Result, ThresholdConfig};
use bmcs_config::{Config, ModelBackend};
use bmcs_eval::{append_report, check_reference, evaluate, gate_applies, Dataset, EvaluationMetrics};
use bmcs_ingestion::{drop_misindexed, load_labelled_dataset, parse_update_file, select_eligible};
use bmcs_models::{load_model, CnnFeatureBuilder, ModelKind, ModelSource, ScoringModel, VotingFeatures};
use bmcs_ranker::{write_predictions, DecisionEngine, PredictionRecord};

pub struct Models {
    pub cnn: Box<dyn ScoringModel>,
    pub voting: Box<dyn ScoringModel>,
}

impl Models {
    pub fn load(config: &Config, cnn_path: &Path, ensemble_path: &Path) -> Result<Self> {
        let source = |runner: &[String]| match config.models.backend {
            ModelBackend::Command => ModelSource::Command { runner: runner.to_vec() },
            ModelBackend::ScoreTable => ModelSource::ScoreTable,
        };
        let cnn = load_model(ModelKind::Cnn, &source(&config.models.cnn_runner), cnn_path)?;
        let voting = load_model(ModelKind::Voting, &source(&config.models.voting_runner), ensemble_path)?;
        Ok(Self { cnn, voting })
    }
}

/// Result of a production run.
#[derive(Debug)]
pub struct ProductionOutcome {
    pub records: Vec<PredictionRecord>,
    pub output: PathBuf,
}

pub struct Pipeline {
    thresholds: ThresholdConfig,
    tables: JournalTables,
    cnn_features: CnnFeatureBuilder,
    models: Models,
    flags: PolicyFlags,
    destination: PathBuf,
}

impl Pipeline {
    pub fn new(
        thresholds: ThresholdConfig,
        tables: JournalTables,
        cnn_features: CnnFeatureBuilder,
        models: Models,
        flags: PolicyFlags,
        destination: PathBuf,
    ) -> Self {
        Self { thresholds, tables, cnn_features, models, flags, destination }
    }

    /// Load tables, feature lookups and both models from configuration.
    pub fn from_config(
        config: &Config,
        flags: PolicyFlags,
        cnn_path: &Path,
        ensemble_path: &Path,
        destination: PathBuf,
    ) -> Result<Self> {
        let thresholds = config.thresholds();
        thresholds.validate()?;
        let tables = JournalTables::load(
            &config.journals.selectively_indexed,
            &config.journals.misindexed,
            &config.journals.groups,
        )?;
        let cnn_features =
            CnnFeatureBuilder::load(&config.features.word_indices, &config.features.journal_ids)?;
        let models = Models::load(config, cnn_path, ensemble_path)?;
        Ok(Self::new(thresholds, tables, cnn_features, models, flags, destination))
    }

    pub fn flags(&self) -> &PolicyFlags {
        &self.flags
    }

    /// Run both models over the batch. Returns `(voting, cnn)` scores.
    fn score(&self, citations: &[Citation]) -> Result<(Vec<f64>, Vec<f64>)> {
        let voting_input = VotingFeatures::from_citations(citations);
        let voting = self.models.voting.predict(&voting_input)?;
        let cnn_input = self.cnn_features.build(citations);
        let cnn = self.models.cnn.predict(&cnn_input)?;
        Ok((voting, cnn))
    }

    fn fuse(&self, citations: &[Citation]) -> Result<Vec<PredictionRecord>> {
        let (voting, cnn) = self.score(citations)?;
        DecisionEngine::new(&self.thresholds, &self.tables).decide(citations, &voting, &cnn, &self.flags)
    }

    /// Classify one MEDLINE XML batch and write the prediction file.
    #[instrument(skip(self))]
    pub fn run_production(&self, xml: &Path) -> Result<ProductionOutcome> {
        if self.flags.predict_all && (self.flags.predict_medline || self.flags.journal_drop) {
            warn!("--predict-medline and --journal-drop have no effect without --filter");
        }
        let citations = parse_update_file(xml)?;
        let eligible = select_eligible(citations, &self.flags, &self.tables)?;
        let records = self.fuse(&eligible)?;
        let output = write_predictions(&records, &self.destination)?;
        Ok(ProductionOutcome { records, output })
    }

    /// Replay a labelled dataset, append the metrics report and, when the
    /// decision path matches the recorded one, check the reference values.
    #[instrument(skip(self))]
    pub fn run_evaluation(
        &self,
        dataset: Dataset,
        path: &Path,
        tolerance: f64,
    ) -> Result<EvaluationMetrics> {
        let mut labelled = load_labelled_dataset(path)?;
        if self.flags.journal_drop {
            labelled = drop_misindexed(labelled, &self.tables);
        }
        let (citations, labels): (Vec<Citation>, Vec<bool>) =
            labelled.into_iter().map(|l| (l.citation, l.is_indexed)).unzip();

        let records = self.fuse(&citations)?;
        let metrics = evaluate(&records, &labels, &self.thresholds, &self.tables, self.flags.group_thresh)?;
        append_report(&self.destination, dataset, &self.flags, tolerance, &metrics)?;

        if gate_applies(&self.flags) {
            check_reference(&metrics, &dataset.reference(), tolerance)?;
        } else {
            info!("Reference metrics not checked for non-default policy flags");
        }
        Ok(metrics)
    }
}
