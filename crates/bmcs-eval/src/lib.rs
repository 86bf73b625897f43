//! bmcs-eval - Evaluation harness.
//! - Binary precision/recall against ground-truth labels
//! - Standalone voting and CNN metrics at their own cutoffs
//! - Cumulative results report
//! - Reference-metric regression gate

pub mod metrics;
pub mod harness;
pub mod report;
pub mod reference;

pub use harness::{evaluate, evaluate_individual_models, EvaluationMetrics};
pub use metrics::BinaryConfusion;
pub use reference::{check_reference, gate_applies, Dataset, ReferenceMetrics};
pub use report::{append_report, REPORT_FILE};
