//! bmcs-models - Everything between an eligible citation and a raw score.
//! - Feature adapters for the voting ensemble and the CNN
//! - The `ScoringModel` seam and its backends (runner process, score table, mock)

pub mod error;
pub mod features;
pub mod invoker;
pub mod command;
pub mod score_table;
pub mod mock;

pub use command::CommandModel;
pub use error::ModelError;
pub use features::cnn::{CnnBatch, CnnFeatureBuilder, IndexLookup};
pub use features::voting::VotingFeatures;
pub use invoker::{load_model, ModelInput, ModelKind, ModelSource, ScoringModel};
pub use mock::MockScoringModel;
pub use score_table::ScoreTableModel;
