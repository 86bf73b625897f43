//! Static journal classification tables.
//!
//! Three read-only resources are loaded once per run:
//! - the selectively indexed journal ids,
//! - the historically misindexed journal ids,
//! - journal group membership (science, jurisprudence).
//!
//! Group membership is disjoint; a journal in no group is `JournalGroup::Other`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{BmcsError, Result};

/// Journal category used to pick a group-specific cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalGroup {
    Science,
    Jurisprudence,
    Other,
}

impl JournalGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalGroup::Science       => "science",
            JournalGroup::Jurisprudence => "jurisprudence",
            JournalGroup::Other         => "other",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JournalTables {
    selectively_indexed: HashSet<String>,
    misindexed: HashSet<String>,
    science: HashSet<String>,
    jurisprudence: HashSet<String>,
}

impl JournalTables {
    /// Build tables from in-memory id lists. Fails if the groups overlap.
    pub fn new<I, S>(
        selectively_indexed: I,
        misindexed: I,
        science: I,
        jurisprudence: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let collect = |ids: I| ids.into_iter().map(Into::into).collect::<HashSet<String>>();
        let tables = Self {
            selectively_indexed: collect(selectively_indexed),
            misindexed: collect(misindexed),
            science: collect(science),
            jurisprudence: collect(jurisprudence),
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Load the three JSON resources from disk.
    pub fn load(
        selectively_indexed: &Path,
        misindexed: &Path,
        groups: &Path,
    ) -> Result<Self> {
        let selective_json = read_json(selectively_indexed)?;
        let misindexed_json = read_json(misindexed)?;
        let groups_json = read_json(groups)?;

        let selectively_indexed = id_set(&selective_json, "selectively indexed ids")?;

        let misindexed_ids = match &misindexed_json {
            Value::Object(map) => map.get("misindexed_ids").ok_or_else(|| {
                BmcsError::Config(format!(
                    "{}: missing \"misindexed_ids\" key",
                    misindexed.display()
                ))
            })?,
            other => other,
        };
        let misindexed = id_set(misindexed_ids, "misindexed ids")?;

        let groups_map = groups_json.as_object().ok_or_else(|| {
            BmcsError::Config(format!("{}: expected an object of groups", groups.display()))
        })?;
        let mut science = HashSet::new();
        let mut jurisprudence = HashSet::new();
        for (name, ids) in groups_map {
            match name.as_str() {
                "science"       => science = id_set(ids, "science group")?,
                "jurisprudence" => jurisprudence = id_set(ids, "jurisprudence group")?,
                other => debug!(group = other, "Ignoring journal group without a threshold"),
            }
        }

        let tables = Self { selectively_indexed, misindexed, science, jurisprudence };
        tables.validate()?;
        debug!(
            selectively_indexed = tables.selectively_indexed.len(),
            misindexed = tables.misindexed.len(),
            science = tables.science.len(),
            jurisprudence = tables.jurisprudence.len(),
            "Journal tables loaded"
        );
        Ok(tables)
    }

    fn validate(&self) -> Result<()> {
        if let Some(id) = self.science.intersection(&self.jurisprudence).next() {
            return Err(BmcsError::Config(format!(
                "journal {id} belongs to both the science and jurisprudence groups"
            )));
        }
        Ok(())
    }

    pub fn is_selectively_indexed(&self, journal_id: Option<&str>) -> bool {
        journal_id.is_some_and(|id| self.selectively_indexed.contains(id))
    }

    pub fn is_misindexed(&self, journal_id: Option<&str>) -> bool {
        journal_id.is_some_and(|id| self.misindexed.contains(id))
    }

    pub fn group_of(&self, journal_id: Option<&str>) -> JournalGroup {
        match journal_id {
            Some(id) if self.science.contains(id)       => JournalGroup::Science,
            Some(id) if self.jurisprudence.contains(id) => JournalGroup::Jurisprudence,
            _ => JournalGroup::Other,
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BmcsError::Config(format!("cannot read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| BmcsError::Config(format!("cannot parse {}: {e}", path.display())))
}

/// Accepts a JSON array of ids or an object keyed by id.
fn id_set(value: &Value, what: &str) -> Result<HashSet<String>> {
    let as_id = |v: &Value| match v {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(BmcsError::Config(format!("{what}: unexpected entry {other}"))),
    };
    match value {
        Value::Array(items) => items.iter().map(as_id).collect(),
        Value::Object(map) => Ok(map.keys().map(|k| k.trim().to_string()).collect()),
        other => Err(BmcsError::Config(format!("{what}: expected array or object, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_group_lookup_falls_back_to_other() {
        let tables = JournalTables::new(
            vec!["A"], vec!["B"], vec!["S1"], vec!["J1"],
        ).unwrap();
        assert_eq!(tables.group_of(Some("S1")), JournalGroup::Science);
        assert_eq!(tables.group_of(Some("J1")), JournalGroup::Jurisprudence);
        assert_eq!(tables.group_of(Some("A")), JournalGroup::Other);
        assert_eq!(tables.group_of(None), JournalGroup::Other);
    }

    #[test]
    fn test_absent_journal_is_in_no_set() {
        let tables = JournalTables::new(vec!["A"], vec!["A"], vec![], vec![]).unwrap();
        assert!(!tables.is_selectively_indexed(None));
        assert!(!tables.is_misindexed(None));
        assert!(tables.is_selectively_indexed(Some("A")));
    }

    #[test]
    fn test_overlapping_groups_rejected() {
        let err = JournalTables::new(vec![], vec![], vec!["X"], vec!["X"]).unwrap_err();
        assert!(matches!(err, BmcsError::Config(_)));
    }

    #[test]
    fn test_load_accepts_mapping_and_wrapped_list() {
        let dir = tempfile::tempdir().unwrap();
        let selective = write_tmp(&dir, "sel.json", r#"{"101528555": "Some Journal", "0372354": "Other"}"#);
        let misindexed = write_tmp(&dir, "mis.json", r#"{"misindexed_ids": ["0372354"]}"#);
        let groups = write_tmp(&dir, "groups.json",
            r#"{"science": ["7503498"], "jurisprudence": [9808944], "chemistry": ["1"]}"#);

        let tables = JournalTables::load(&selective, &misindexed, &groups).unwrap();
        assert!(tables.is_selectively_indexed(Some("101528555")));
        assert!(tables.is_misindexed(Some("0372354")));
        assert_eq!(tables.group_of(Some("9808944")), JournalGroup::Jurisprudence);
        assert_eq!(tables.group_of(Some("1")), JournalGroup::Other);
    }

    #[test]
    fn test_load_missing_misindexed_key() {
        let dir = tempfile::tempdir().unwrap();
        let selective = write_tmp(&dir, "sel.json", "[]");
        let misindexed = write_tmp(&dir, "mis.json", r#"{"ids": []}"#);
        let groups = write_tmp(&dir, "groups.json", "{}");
        assert!(JournalTables::load(&selective, &misindexed, &groups).is_err());
    }
}
