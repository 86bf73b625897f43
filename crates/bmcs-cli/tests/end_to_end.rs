//! Full pipeline runs over the seven-record fixture with mock models.

use std::path::Path;

use bmcs_cli::{Models, Pipeline};
use bmcs_common::{BmcsError, PolicyFlags, ThresholdConfig};
use bmcs_eval::{Dataset, REPORT_FILE};
use bmcs_models::{CnnFeatureBuilder, IndexLookup, MockScoringModel};
use bmcs_ranker::ScopeLabel;
use bmcs_test_utils::{assert_eq, fixture_path, fixture_scores, fixture_tables, FIXTURE_PMIDS};

fn mock_models() -> Models {
    let mut voting = MockScoringModel::new("voting");
    let mut cnn = MockScoringModel::new("CNN");
    for (pmid, v, c) in fixture_scores() {
        voting = voting.with(pmid, v);
        cnn = cnn.with(pmid, c);
    }
    Models { cnn: Box::new(cnn), voting: Box::new(voting) }
}

fn pipeline(flags: PolicyFlags, destination: &Path) -> Pipeline {
    Pipeline::new(
        ThresholdConfig::default(),
        fixture_tables(),
        CnnFeatureBuilder::new(IndexLookup::default(), IndexLookup::default()),
        mock_models(),
        flags,
        destination.to_path_buf(),
    )
}

fn codes(labels: impl IntoIterator<Item = ScopeLabel>) -> Vec<u8> {
    labels.into_iter().map(|l| l.code()).collect()
}

#[test]
fn test_reference_batch_labels() {
    let dir = tempfile::tempdir().unwrap();
    let flags = PolicyFlags {
        predict_all: true,
        journal_drop: true,
        pub_type_filter: true,
        ..Default::default()
    };
    let outcome = pipeline(flags, dir.path()).run_production(&fixture_path()).unwrap();

    let pmids: Vec<u64> = outcome.records.iter().map(|r| r.pmid).collect();
    assert_eq!(pmids, FIXTURE_PMIDS.to_vec());
    // two erratum-like titles go to special review, one citation clears the precision cutoff
    assert_eq!(codes(outcome.records.iter().map(|r| r.label)), vec![0, 0, 2, 0, 1, 3, 3]);

    let lines: Vec<String> = std::fs::read_to_string(&outcome.output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[4].starts_with("30886396|1|0.85"));
    assert!(lines[4].ends_with("|101528555"));
}

#[test]
fn test_pub_type_filter_off_keeps_review_labels() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = pipeline(PolicyFlags::default(), dir.path())
        .run_production(&fixture_path())
        .unwrap();
    assert_eq!(codes(outcome.records.iter().map(|r| r.label)), vec![0, 0, 2, 0, 1, 2, 2]);
}

#[test]
fn test_filtered_batch() {
    let dir = tempfile::tempdir().unwrap();
    let flags = PolicyFlags {
        predict_all: false,
        journal_drop: true,
        pub_type_filter: true,
        ..Default::default()
    };
    let outcome = pipeline(flags, dir.path()).run_production(&fixture_path()).unwrap();
    let got: Vec<(u64, u8)> = outcome.records.iter().map(|r| (r.pmid, r.label.code())).collect();
    assert_eq!(got, vec![(30886396, 1), (30299937, 3)]);
}

#[test]
fn test_empty_eligible_set_stops_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let tables = bmcs_common::JournalTables::new(
        vec!["0404511"], vec![], vec![], vec![],
    )
    .unwrap();
    let pipeline = Pipeline::new(
        ThresholdConfig::default(),
        tables,
        CnnFeatureBuilder::new(IndexLookup::default(), IndexLookup::default()),
        mock_models(),
        PolicyFlags { predict_all: false, predict_medline: true, ..Default::default() },
        dir.path().to_path_buf(),
    );
    let err = pipeline.run_production(&fixture_path()).unwrap_err();
    assert!(matches!(err, BmcsError::EmptyEligibleSet));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

fn write_dataset(dir: &Path) -> std::path::PathBuf {
    let rows: Vec<serde_json::Value> = FIXTURE_PMIDS
        .iter()
        .zip([false, false, true, true, true, false, true])
        .map(|(pmid, indexed)| {
            let journal = if *pmid == 29994383 { "101672779" } else { "0404511" };
            serde_json::json!({
                "pmid": pmid,
                "title": "",
                "abstract": "",
                "author_list": "",
                "journal_nlmid": journal,
                "pub_year": 2018,
                "is_indexed": u8::from(indexed),
            })
        })
        .collect();
    let path = dir.join("validation_set.json");
    std::fs::write(&path, serde_json::to_string(&rows).unwrap()).unwrap();
    path
}

#[test]
fn test_evaluation_with_default_flags_hits_the_reference_gate() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(dir.path());
    let err = pipeline(PolicyFlags::default(), dir.path())
        .run_evaluation(Dataset::Validation, &dataset, 0.001)
        .unwrap_err();
    assert!(matches!(err, BmcsError::Regression { .. }));
    // the report is written before the gate runs
    assert!(dir.path().join(REPORT_FILE).exists());
}

#[test]
fn test_evaluation_with_journal_drop_skips_gate() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = write_dataset(dir.path());
    let flags = PolicyFlags { journal_drop: true, ..Default::default() };
    let metrics = pipeline(flags, dir.path())
        .run_evaluation(Dataset::Validation, &dataset, 0.001)
        .unwrap();

    // 29994383 is dropped; remaining labels 0,0,1,1,0,1 with fused labels 0,0,2,1,2,2
    assert_eq!(metrics.bmcs_recall, 1.0);
    assert_eq!(metrics.bmcs_precision, 0.75);
    assert!((metrics.in_scope_recall - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(metrics.in_scope_precision, 1.0);

    let report = std::fs::read_to_string(dir.path().join(REPORT_FILE)).unwrap();
    assert!(report.contains("journal_drop: true"));
    assert!(report.contains("BmCS recall: 1"));
}
