use std::path::PathBuf;

use clap::Parser;

use bmcs_common::{PolicyFlags, RunMode};

/// Biomedical Citation Selector: score MEDLINE citations for selective indexing.
#[derive(Parser, Debug, Clone)]
#[clap(name = "bmcs", version)]
pub struct Cli {
    /// CNN model artifact (weights)
    #[clap(value_name = "CNN_PATH")]
    pub cnn_path: PathBuf,

    /// Voting ensemble model artifact
    #[clap(value_name = "ENSEMBLE_PATH")]
    pub ensemble_path: PathBuf,

    /// MEDLINE XML file of citations to classify
    #[clap(long, value_name = "FILE", required_unless_present_any = ["validation", "test"])]
    pub path: Option<PathBuf>,

    /// Only score citations selected by status and journal instead of every citation
    #[clap(long)]
    pub filter: bool,

    /// Drop citations from journals with a history of misindexing
    #[clap(long)]
    pub journal_drop: bool,

    /// Send flagged publication types (errata, comments, ...) to special review
    #[clap(long = "pubtype-filter")]
    pub pub_type_filter: bool,

    /// Directory for predictions and evaluation results
    #[clap(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Evaluate on the validation dataset
    #[clap(long)]
    pub validation: bool,

    /// Evaluate on the test dataset
    #[clap(long, conflicts_with = "validation")]
    pub test: bool,

    /// With --filter, score MEDLINE citations from journals that are not selectively indexed
    #[clap(long)]
    pub predict_medline: bool,

    /// Use the science and jurisprudence cutoffs
    #[clap(long)]
    pub group_thresh: bool,

    /// Allowed distance from the reference metrics in evaluation runs
    #[clap(long, default_value = "0.001")]
    pub tolerance: f64,

    /// Configuration file (defaults to bmcs.toml)
    #[clap(long, value_name = "FILE", env = "BMCS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn flags(&self) -> PolicyFlags {
        PolicyFlags {
            predict_all: !self.filter,
            predict_medline: self.predict_medline,
            journal_drop: self.journal_drop,
            group_thresh: self.group_thresh,
            pub_type_filter: self.pub_type_filter,
        }
    }

    pub fn mode(&self) -> RunMode {
        if self.test {
            RunMode::Test
        } else if self.validation {
            RunMode::Validation
        } else {
            RunMode::Production
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("bmcs").chain(args.iter().copied()))
    }

    #[test]
    fn test_production_flags() {
        let cli = parse(&[
            "cnn.hdf5", "ensemble.joblib", "--path", "batch.xml",
            "--filter", "--journal-drop", "--pubtype-filter",
        ])
        .unwrap();
        assert_eq!(cli.mode(), RunMode::Production);
        let flags = cli.flags();
        assert!(!flags.predict_all);
        assert!(flags.journal_drop);
        assert!(flags.pub_type_filter);
        assert!(!flags.group_thresh);
        assert_eq!(cli.tolerance, 0.001);
    }

    #[test]
    fn test_without_filter_everything_is_scored() {
        let cli = parse(&["c", "e", "--path", "x.xml"]).unwrap();
        assert!(cli.flags().predict_all);
    }

    #[test]
    fn test_path_required_outside_evaluation() {
        assert!(parse(&["c", "e"]).is_err());
        let cli = parse(&["c", "e", "--validation"]).unwrap();
        assert_eq!(cli.mode(), RunMode::Validation);
    }

    #[test]
    fn test_validation_and_test_conflict() {
        assert!(parse(&["c", "e", "--validation", "--test"]).is_err());
        assert_eq!(parse(&["c", "e", "--test"]).unwrap().mode(), RunMode::Test);
    }
}
