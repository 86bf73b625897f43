//! The citation record shared by extraction, filtering, feature adaptation and fusion.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// MEDLINE indexing status, read from the `Status` attribute of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IndexingStatus {
    Medline,
    PubMedNotMedline,
    InProcess,
    InDataReview,
    Publisher,
    /// Attribute absent from the record.
    Unspecified,
    Other(String),
}

impl IndexingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            IndexingStatus::Medline          => "MEDLINE",
            IndexingStatus::PubMedNotMedline => "PubMed-not-MEDLINE",
            IndexingStatus::InProcess        => "In-Process",
            IndexingStatus::InDataReview     => "In-Data-Review",
            IndexingStatus::Publisher        => "Publisher",
            IndexingStatus::Unspecified      => "",
            IndexingStatus::Other(s)         => s.as_str(),
        }
    }

    /// `MEDLINE` and `PubMed-not-MEDLINE` are the two settled statuses.
    pub fn is_settled(&self) -> bool {
        matches!(self, IndexingStatus::Medline | IndexingStatus::PubMedNotMedline)
    }
}

impl From<&str> for IndexingStatus {
    fn from(s: &str) -> Self {
        match s.trim() {
            "MEDLINE"            => IndexingStatus::Medline,
            "PubMed-not-MEDLINE" => IndexingStatus::PubMedNotMedline,
            "In-Process"         => IndexingStatus::InProcess,
            "In-Data-Review"     => IndexingStatus::InDataReview,
            "Publisher"          => IndexingStatus::Publisher,
            ""                   => IndexingStatus::Unspecified,
            other                => IndexingStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for IndexingStatus {
    fn from(s: String) -> Self {
        IndexingStatus::from(s.as_str())
    }
}

impl From<IndexingStatus> for String {
    fn from(status: IndexingStatus) -> Self {
        status.as_str().to_string()
    }
}

impl Default for IndexingStatus {
    fn default() -> Self {
        IndexingStatus::Unspecified
    }
}

impl fmt::Display for IndexingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bibliographic record. Built once per XML record or dataset entry and
/// never mutated afterwards.
///
/// Field names on the wire follow the labelled dataset format
/// (`abstract`, `author_list`, `journal_nlmid`, `pub_type`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub pmid: u64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(rename = "author_list", alias = "affiliations", default)]
    pub affiliations: String,
    #[serde(rename = "journal_nlmid", default, deserialize_with = "empty_as_none")]
    pub journal_id: Option<String>,
    #[serde(default)]
    pub pub_year: Option<i32>,
    #[serde(default)]
    pub status: IndexingStatus,
    #[serde(rename = "pub_type", default)]
    pub pub_types: Vec<String>,
}

impl Citation {
    pub fn journal_id(&self) -> Option<&str> {
        self.journal_id.as_deref()
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_known_values() {
        for raw in ["MEDLINE", "PubMed-not-MEDLINE", "In-Process", "In-Data-Review", "Publisher"] {
            assert_eq!(IndexingStatus::from(raw).as_str(), raw);
        }
        assert_eq!(IndexingStatus::from("OLDMEDLINE"), IndexingStatus::Other("OLDMEDLINE".into()));
        assert_eq!(IndexingStatus::from("  "), IndexingStatus::Unspecified);
    }

    #[test]
    fn test_settled_statuses() {
        assert!(IndexingStatus::Medline.is_settled());
        assert!(IndexingStatus::PubMedNotMedline.is_settled());
        assert!(!IndexingStatus::InProcess.is_settled());
        assert!(!IndexingStatus::Unspecified.is_settled());
    }

    #[test]
    fn test_dataset_field_names() {
        let json = r#"{
            "pmid": 30886396,
            "title": "A title",
            "abstract": "Background: text",
            "author_list": "Dept. of Medicine",
            "journal_nlmid": "101528555",
            "pub_year": 2019,
            "pub_type": ["Journal Article"]
        }"#;
        let c: Citation = serde_json::from_str(json).unwrap();
        assert_eq!(c.pmid, 30886396);
        assert_eq!(c.abstract_text, "Background: text");
        assert_eq!(c.affiliations, "Dept. of Medicine");
        assert_eq!(c.journal_id(), Some("101528555"));
        assert_eq!(c.status, IndexingStatus::Unspecified);
    }

    #[test]
    fn test_blank_journal_is_absent() {
        let c: Citation = serde_json::from_str(r#"{"pmid": 1, "journal_nlmid": " "}"#).unwrap();
        assert_eq!(c.journal_id, None);
        assert_eq!(c.pub_year, None);
        assert!(c.pub_types.is_empty());
    }
}
