//! Known-good metrics for the bundled datasets, used as a regression gate.

use serde::Serialize;
use tracing::info;

use bmcs_common::{BmcsError, PolicyFlags, Result, RunMode};

use crate::harness::EvaluationMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Validation,
    Test,
}

impl Dataset {
    pub fn from_mode(mode: RunMode) -> Option<Self> {
        match mode {
            RunMode::Validation => Some(Dataset::Validation),
            RunMode::Test       => Some(Dataset::Test),
            RunMode::Production => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Validation => "validation",
            Dataset::Test       => "test",
        }
    }

    pub fn reference(&self) -> ReferenceMetrics {
        match self {
            Dataset::Validation => ReferenceMetrics {
                recall: 0.995079049314208,
                precision: 0.7191827468785471,
                in_scope_recall: 0.7309705789969637,
                in_scope_precision: 0.9700569681811866,
            },
            Dataset::Test => ReferenceMetrics {
                recall: 0.9940239043824701,
                precision: 0.7133666904932094,
                in_scope_recall: 0.723937583001328,
                in_scope_precision: 0.969218802089121,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceMetrics {
    pub recall: f64,
    pub precision: f64,
    pub in_scope_recall: f64,
    pub in_scope_precision: f64,
}

/// Reference values were recorded with default policy; any flag that changes
/// the decision path makes them inapplicable.
pub fn gate_applies(flags: &PolicyFlags) -> bool {
    !flags.group_thresh && !flags.journal_drop && !flags.pub_type_filter
}

/// Fails on the first metric further than `tolerance` from its reference.
pub fn check_reference(
    metrics: &EvaluationMetrics,
    reference: &ReferenceMetrics,
    tolerance: f64,
) -> Result<()> {
    let pairs = [
        ("BmCS recall", reference.recall, metrics.bmcs_recall),
        ("BmCS precision", reference.precision, metrics.bmcs_precision),
        ("BmCS in-scope recall", reference.in_scope_recall, metrics.in_scope_recall),
        ("BmCS in-scope precision", reference.in_scope_precision, metrics.in_scope_precision),
    ];
    for (metric, expected, actual) in pairs {
        if (actual - expected).abs() > tolerance {
            return Err(BmcsError::Regression {
                metric: metric.to_string(),
                expected,
                actual,
                tolerance,
            });
        }
    }
    info!("Assertions passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_from(r: &ReferenceMetrics) -> EvaluationMetrics {
        EvaluationMetrics {
            bmcs_recall: r.recall,
            bmcs_precision: r.precision,
            voting_recall: 0.0,
            voting_precision: 0.0,
            cnn_recall: 0.0,
            cnn_precision: 0.0,
            in_scope_recall: r.in_scope_recall,
            in_scope_precision: r.in_scope_precision,
        }
    }

    #[test]
    fn test_within_tolerance_passes() {
        let reference = Dataset::Validation.reference();
        let mut m = metrics_from(&reference);
        m.bmcs_precision += 0.0009;
        assert!(check_reference(&m, &reference, 0.001).is_ok());
    }

    #[test]
    fn test_regression_names_the_metric() {
        let reference = Dataset::Test.reference();
        let mut m = metrics_from(&reference);
        m.in_scope_recall -= 0.01;
        match check_reference(&m, &reference, 0.001) {
            Err(BmcsError::Regression { metric, expected, .. }) => {
                assert_eq!(metric, "BmCS in-scope recall");
                assert_eq!(expected, 0.723937583001328);
            }
            other => panic!("expected regression, got {other:?}"),
        }
    }

    #[test]
    fn test_gate_only_with_default_decision_path() {
        assert!(gate_applies(&PolicyFlags::default()));
        for flags in [
            PolicyFlags { group_thresh: true, ..Default::default() },
            PolicyFlags { journal_drop: true, ..Default::default() },
            PolicyFlags { pub_type_filter: true, ..Default::default() },
        ] {
            assert!(!gate_applies(&flags));
        }
        // predict_medline has no effect on datasets
        assert!(gate_applies(&PolicyFlags { predict_medline: true, ..Default::default() }));
    }

    #[test]
    fn test_dataset_from_mode() {
        assert_eq!(Dataset::from_mode(RunMode::Test), Some(Dataset::Test));
        assert_eq!(Dataset::from_mode(RunMode::Production), None);
    }
}
