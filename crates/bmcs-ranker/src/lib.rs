//! bmcs-ranker - Decision fusion.
//! - Score combination (pointwise product)
//! - Thresholding, global or per journal group
//! - Publication-type override and high-confidence auto-accept
//! - Pipe-delimited prediction file

pub mod label;
pub mod fusion;
pub mod pub_type;
pub mod output;

pub use fusion::{combine_scores, DecisionEngine, PredictionRecord};
pub use label::ScopeLabel;
pub use output::{predictions_file_name, write_predictions, write_predictions_dated};
pub use pub_type::is_flagged_publication;
