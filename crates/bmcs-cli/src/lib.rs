//! bmcs-cli - Orchestration for the `bmcs` binary.
//! - `cli`: command-line surface
//! - `pipeline`: production and evaluation runs over loaded resources

pub mod cli;
pub mod pipeline;

pub use cli::Cli;
pub use pipeline::{Models, Pipeline, ProductionOutcome};
