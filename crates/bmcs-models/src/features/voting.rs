//! Text columns for the voting ensemble.

use serde::Serialize;

use bmcs_common::Citation;

use crate::invoker::ModelInput;

/// Substituted for empty text fields; the ensemble's vectorizers were fitted with it.
pub const EMPTY_SENTINEL: &str = "None";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VotingFeatures {
    pub pmids: Vec<u64>,
    pub titles: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstracts: Vec<String>,
    pub author_list: Vec<String>,
    #[serde(skip)]
    pub journal_ids: Vec<Option<String>>,
}

fn or_sentinel(text: &str) -> String {
    if text.trim().is_empty() {
        EMPTY_SENTINEL.to_string()
    } else {
        text.to_string()
    }
}

impl VotingFeatures {
    pub fn from_citations(citations: &[Citation]) -> Self {
        let mut features = Self {
            pmids: Vec::with_capacity(citations.len()),
            titles: Vec::with_capacity(citations.len()),
            abstracts: Vec::with_capacity(citations.len()),
            author_list: Vec::with_capacity(citations.len()),
            journal_ids: Vec::with_capacity(citations.len()),
        };
        for c in citations {
            features.pmids.push(c.pmid);
            features.titles.push(or_sentinel(&c.title));
            features.abstracts.push(or_sentinel(&c.abstract_text));
            features.author_list.push(or_sentinel(&c.affiliations));
            features.journal_ids.push(c.journal_id.clone());
        }
        features
    }

    pub fn len(&self) -> usize {
        self.pmids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pmids.is_empty()
    }
}

impl ModelInput for VotingFeatures {
    fn pmids(&self) -> &[u64] {
        &self.pmids
    }

    fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmcs_test_utils::CitationBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_fields_become_sentinel() {
        let citations = vec![
            CitationBuilder::new(7).title("Heart failure").journal("J1").build(),
            CitationBuilder::new(3).abstract_text("Some text").affiliations("  ").build(),
        ];
        let f = VotingFeatures::from_citations(&citations);

        assert_eq!(f.pmids, vec![7, 3]);
        assert_eq!(f.titles, vec!["Heart failure", "None"]);
        assert_eq!(f.abstracts, vec!["None", "Some text"]);
        assert_eq!(f.author_list, vec!["None", "None"]);
        assert_eq!(f.journal_ids, vec![Some("J1".to_string()), None]);
    }

    #[test]
    fn test_payload_columns() {
        let f = VotingFeatures::from_citations(&[CitationBuilder::new(1).title("T").build()]);
        let payload = f.to_payload().unwrap();
        assert_eq!(payload["titles"][0], "T");
        assert_eq!(payload["abstract"][0], "None");
        assert_eq!(payload["author_list"][0], "None");
        assert_eq!(payload["pmids"][0], 1);
        assert!(payload.get("journal_ids").is_none());
    }
}
