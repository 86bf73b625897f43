//! Shared fixtures for BmCS tests.
//!
//! `FIXTURE_XML` holds seven MEDLINE records covering every filter path:
//!
//! | idx | PMID     | status             | journal     | selective | misindexed |
//! |-----|----------|--------------------|-------------|-----------|------------|
//! | 0   | 12269810 | MEDLINE            | 0404511     | no        | no         |
//! | 1   | 21179314 | PubMed-not-MEDLINE | 101502822   | no        | no         |
//! | 2   | 30160246 | PubMed-not-MEDLINE | 101528555   | yes       | no         |
//! | 3   | 29994383 | In-Process         | 101672779   | yes       | yes        |
//! | 4   | 30886396 | In-Process         | 101528555   | yes       | no         |
//! | 5   | 30883917 | In-Process         | 0255562     | no        | no         |
//! | 6   | 30299937 | In-Process         | 101600173   | yes       | no         |

use std::path::{Path, PathBuf};

use bmcs_common::{Citation, IndexingStatus, JournalTables};
use serde_json::json;

pub use pretty_assertions::assert_eq;

pub const FIXTURE_XML: &str = include_str!("../fixtures/test_citations.xml");

/// PMIDs of `FIXTURE_XML`, in document order.
pub const FIXTURE_PMIDS: [u64; 7] = [
    12269810, 21179314, 30160246, 29994383, 30886396, 30883917, 30299937,
];

const SELECTIVE: [&str; 3] = ["101528555", "101672779", "101600173"];
const MISINDEXED: [&str; 1] = ["101672779"];
const SCIENCE: [&str; 1] = ["0255562"];
const JURISPRUDENCE: [&str; 1] = ["0404511"];

pub fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/test_citations.xml")
}

/// Journal tables matching the fixture journals.
pub fn fixture_tables() -> JournalTables {
    JournalTables::new(
        SELECTIVE.to_vec(),
        MISINDEXED.to_vec(),
        SCIENCE.to_vec(),
        JURISPRUDENCE.to_vec(),
    )
    .expect("fixture groups are disjoint")
}

/// Paths to the three journal resources written by `write_journal_resources`.
#[derive(Debug, Clone)]
pub struct JournalResourcePaths {
    pub selectively_indexed: PathBuf,
    pub misindexed: PathBuf,
    pub groups: PathBuf,
}

/// Write the fixture journal tables as JSON resources under `dir`.
pub fn write_journal_resources(dir: &Path) -> JournalResourcePaths {
    let paths = JournalResourcePaths {
        selectively_indexed: dir.join("selectively_indexed_id_mapping.json"),
        misindexed: dir.join("misindexed_journal_ids.json"),
        groups: dir.join("group_ids.json"),
    };
    let selective: serde_json::Map<String, serde_json::Value> = SELECTIVE
        .iter()
        .map(|id| (id.to_string(), json!(1)))
        .collect();
    write_json(&paths.selectively_indexed, &serde_json::Value::Object(selective));
    write_json(&paths.misindexed, &json!({ "misindexed_ids": MISINDEXED }));
    write_json(
        &paths.groups,
        &json!({ "science": SCIENCE, "jurisprudence": JURISPRUDENCE }),
    );
    paths
}

fn write_json(path: &Path, value: &serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Deterministic (voting, cnn) scores per fixture PMID.
///
/// With default thresholds the final labels are `[0, 0, 2, 0, 1, 3, 3]`:
/// idx4 clears the precision cutoff, idx5 and idx6 are erratum-like titles.
pub fn fixture_scores() -> Vec<(u64, f64, f64)> {
    FIXTURE_PMIDS
        .iter()
        .copied()
        .zip([
            (0.9, 0.1),
            (0.2, 0.3),
            (0.6, 0.6),
            (0.5, 0.2),
            (0.95, 0.9),
            (0.7, 0.6),
            (0.8, 0.5),
        ])
        .map(|(pmid, (voting, cnn))| (pmid, voting, cnn))
        .collect()
}

/// Fluent builder for `Citation` values in unit tests.
#[derive(Debug, Clone)]
pub struct CitationBuilder {
    citation: Citation,
}

impl CitationBuilder {
    pub fn new(pmid: u64) -> Self {
        Self {
            citation: Citation {
                pmid,
                title: String::new(),
                abstract_text: String::new(),
                affiliations: String::new(),
                journal_id: None,
                pub_year: None,
                status: IndexingStatus::InProcess,
                pub_types: vec![],
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.citation.title = title.to_string();
        self
    }

    pub fn abstract_text(mut self, text: &str) -> Self {
        self.citation.abstract_text = text.to_string();
        self
    }

    pub fn affiliations(mut self, text: &str) -> Self {
        self.citation.affiliations = text.to_string();
        self
    }

    pub fn journal(mut self, id: &str) -> Self {
        self.citation.journal_id = Some(id.to_string());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.citation.pub_year = Some(year);
        self
    }

    pub fn status(mut self, status: IndexingStatus) -> Self {
        self.citation.status = status;
        self
    }

    pub fn pub_type(mut self, pub_type: &str) -> Self {
        self.citation.pub_types.push(pub_type.to_string());
        self
    }

    pub fn build(self) -> Citation {
        self.citation
    }
}
