//! MEDLINE XML citation extractor.
//!
//! Reads `PubmedArticleSet/PubmedArticle/MedlineCitation` records from a
//! daily update file. Fields extracted: PMID, title, abstract, affiliations,
//! journal id, publication year, indexing status and publication types.
//!
//! A record without a usable PMID is fatal for the whole file.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info, instrument};

use bmcs_common::{BmcsError, Citation, IndexingStatus, Result};

use crate::pub_date::resolve_year;

/// Affiliation text used when a record carries no affiliation at all.
pub const NO_AFFILIATIONS: &str = "None";

/// Read and parse one update file.
#[instrument]
pub fn parse_update_file(path: &Path) -> Result<Vec<Citation>> {
    let xml = std::fs::read_to_string(path)?;
    let citations = parse_medline_xml(&xml)?;
    info!(count = citations.len(), "Parsed citations from update file");
    Ok(citations)
}

/// Element text being collected for the current record.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Pmid,
    Title,
    AbstractText,
    Affiliation,
    JournalId,
    Year,
    MedlineDate,
    PublicationType,
}

#[derive(Debug)]
struct Capture {
    field: Field,
    /// Depth of the element that opened the capture.
    depth: usize,
    label: Option<String>,
    text: String,
}

#[derive(Debug)]
struct AbstractSection {
    label: Option<String>,
    text: String,
}

#[derive(Debug, Default)]
struct CitationDraft {
    pmid: Option<String>,
    status: IndexingStatus,
    title: Option<String>,
    sections: Vec<AbstractSection>,
    affiliations: Vec<String>,
    journal_id: Option<String>,
    year: Option<String>,
    medline_date: Option<String>,
    pub_types: Vec<String>,
}

impl CitationDraft {
    fn store(&mut self, capture: Capture) {
        let text = capture.text;
        match capture.field {
            Field::Pmid        => self.pmid = Some(text),
            Field::Title       => self.title = Some(text),
            Field::JournalId   => self.journal_id = Some(text),
            Field::Year        => self.year = Some(text),
            Field::MedlineDate => self.medline_date = Some(text),
            Field::Affiliation => self.affiliations.push(text),
            Field::PublicationType => self.pub_types.push(text),
            Field::AbstractText => self.sections.push(AbstractSection {
                label: capture.label,
                text,
            }),
        }
    }

    fn finish(self, ordinal: usize) -> Result<Citation> {
        let record = format!("record #{ordinal}");
        let raw_pmid = self
            .pmid
            .ok_or_else(|| BmcsError::malformed(&record, "missing PMID"))?;
        let pmid = match raw_pmid.trim().parse::<u64>() {
            Ok(0) | Err(_) => {
                return Err(BmcsError::malformed(
                    &record,
                    format!("PMID {:?} is not a positive integer", raw_pmid.trim()),
                ))
            }
            Ok(id) => id,
        };

        let pub_year = resolve_year(self.year.as_deref(), self.medline_date.as_deref());
        if pub_year.is_none() {
            debug!(pmid, "Publication year unknown");
        }

        let affiliations = if self.affiliations.is_empty() {
            NO_AFFILIATIONS.to_string()
        } else {
            // AffiliationInfo may hold several children; collapse their layout whitespace
            self.affiliations
                .iter()
                .flat_map(|a| a.split_whitespace())
                .collect::<Vec<_>>()
                .join(" ")
        };

        Ok(Citation {
            pmid,
            title: self.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            abstract_text: assemble_abstract(&self.sections),
            affiliations,
            journal_id: self
                .journal_id
                .map(|j| j.trim().to_string())
                .filter(|j| !j.is_empty()),
            pub_year,
            status: self.status,
            pub_types: self
                .pub_types
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        })
    }
}

/// "Label: text" for labelled sections, sections joined by one space.
fn assemble_abstract(sections: &[AbstractSection]) -> String {
    sections
        .iter()
        .filter_map(|s| {
            let text = s.text.trim();
            match s.label.as_deref().map(str::trim) {
                Some(label) if !label.is_empty() => Some(format!("{label}: {text}").trim_end().to_string()),
                _ if text.is_empty() => None,
                _ => Some(text.to_string()),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Which field (if any) an element opens, given its path inside the record.
fn field_for(rel: &[String]) -> Option<Field> {
    let rel: Vec<&str> = rel.iter().map(String::as_str).collect();
    match rel.as_slice() {
        ["PMID"] => Some(Field::Pmid),
        ["Article", "ArticleTitle"] => Some(Field::Title),
        ["Article", "Abstract", "AbstractText"] => Some(Field::AbstractText),
        ["MedlineJournalInfo", "NlmUniqueID"] => Some(Field::JournalId),
        ["Article", "Journal", "JournalIssue", "PubDate", "Year"] => Some(Field::Year),
        ["Article", "Journal", "JournalIssue", "PubDate", "MedlineDate"] => Some(Field::MedlineDate),
        [.., "AffiliationInfo"] => Some(Field::Affiliation),
        [.., "PublicationType"] => Some(Field::PublicationType),
        _ => None,
    }
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match e.try_get_attribute(name) {
        Ok(Some(attr)) => attr
            .unescape_value()
            .map(|v| Some(v.into_owned()))
            .map_err(|err| BmcsError::Xml(err.to_string())),
        Ok(None) => Ok(None),
        Err(err) => Err(BmcsError::Xml(err.to_string())),
    }
}

/// Parse a MEDLINE XML document into citations, in document order.
pub fn parse_medline_xml(xml: &str) -> Result<Vec<Citation>> {
    let mut citations = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().expand_empty_elements = true;

    let mut path: Vec<String> = Vec::new();
    // Depth just below the open MedlineCitation element.
    let mut record_depth: Option<usize> = None;
    let mut draft: Option<CitationDraft> = None;
    let mut capture: Option<Capture> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            BmcsError::Xml(format!("at byte {}: {e}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                path.push(name);

                if draft.is_none() {
                    let is_record = path.len() == 3
                        && path[1] == "PubmedArticle"
                        && path[2] == "MedlineCitation";
                    if is_record {
                        let status = attribute(e, "Status")?
                            .map(IndexingStatus::from)
                            .unwrap_or_default();
                        draft = Some(CitationDraft { status, ..Default::default() });
                        record_depth = Some(path.len());
                    }
                } else if capture.is_none() {
                    if let Some(depth) = record_depth {
                        if let Some(field) = field_for(&path[depth..]) {
                            let label = if field == Field::AbstractText {
                                attribute(e, "Label")?
                            } else {
                                None
                            };
                            capture = Some(Capture { field, depth: path.len(), label, text: String::new() });
                        }
                    }
                }
            }
            Event::Text(ref e) => {
                if let Some(c) = capture.as_mut() {
                    let text = e.unescape().map_err(|err| BmcsError::Xml(err.to_string()))?;
                    c.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(c) = capture.as_mut() {
                    c.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                let depth = path.len();
                if capture.as_ref().is_some_and(|c| c.depth == depth) {
                    if let (Some(c), Some(d)) = (capture.take(), draft.as_mut()) {
                        d.store(c);
                    }
                }
                if record_depth == Some(depth) {
                    if let Some(d) = draft.take() {
                        citations.push(d.finish(citations.len() + 1)?);
                    }
                    record_depth = None;
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!(count = citations.len(), "MEDLINE records extracted");
    Ok(citations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wrap(citation: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<PubmedArticleSet>
  <PubmedArticle>
    {citation}
  </PubmedArticle>
</PubmedArticleSet>"#
        )
    }

    #[test]
    fn test_parse_full_record() {
        let xml = wrap(r#"
    <MedlineCitation Status="In-Process" Owner="NLM">
      <PMID Version="1">30886396</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate><Year>2019</Year><Month>Mar</Month></PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>Insulin <i>resistance</i> in adolescents.</ArticleTitle>
        <Abstract>
          <AbstractText Label="BACKGROUND" NlmCategory="BACKGROUND">Obesity is common.</AbstractText>
          <AbstractText Label="METHODS">We measured &lt;things&gt;.</AbstractText>
        </Abstract>
        <AuthorList>
          <Author>
            <LastName>Smith</LastName>
            <AffiliationInfo><Affiliation>Dept. of Pediatrics, Boston.</Affiliation></AffiliationInfo>
          </Author>
          <Author>
            <LastName>Jones</LastName>
            <AffiliationInfo><Affiliation>School of Medicine, Denver.</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
        <PublicationTypeList>
          <PublicationType UI="D016428">Journal Article</PublicationType>
          <PublicationType UI="D016454">Review</PublicationType>
        </PublicationTypeList>
      </Article>
      <MedlineJournalInfo>
        <NlmUniqueID>101528555</NlmUniqueID>
      </MedlineJournalInfo>
      <CommentsCorrectionsList>
        <CommentsCorrections RefType="CommentOn"><PMID Version="1">11111111</PMID></CommentsCorrections>
      </CommentsCorrectionsList>
    </MedlineCitation>"#);

        let citations = parse_medline_xml(&xml).unwrap();
        assert_eq!(citations.len(), 1);
        let c = &citations[0];
        assert_eq!(c.pmid, 30886396);
        assert_eq!(c.title, "Insulin resistance in adolescents.");
        assert_eq!(c.abstract_text, "BACKGROUND: Obesity is common. METHODS: We measured <things>.");
        assert_eq!(c.affiliations, "Dept. of Pediatrics, Boston. School of Medicine, Denver.");
        assert_eq!(c.journal_id.as_deref(), Some("101528555"));
        assert_eq!(c.pub_year, Some(2019));
        assert_eq!(c.status, IndexingStatus::InProcess);
        assert_eq!(c.pub_types, vec!["Journal Article".to_string(), "Review".to_string()]);
    }

    #[test]
    fn test_missing_optional_fields() {
        let xml = wrap(r#"
    <MedlineCitation Status="MEDLINE">
      <PMID>12269810</PMID>
      <Article>
        <Journal><JournalIssue><PubDate><MedlineDate>1998 Dec-1999 Jan</MedlineDate></PubDate></JournalIssue></Journal>
        <ArticleTitle>Untitled</ArticleTitle>
      </Article>
    </MedlineCitation>"#);

        let c = &parse_medline_xml(&xml).unwrap()[0];
        assert_eq!(c.abstract_text, "");
        assert_eq!(c.affiliations, NO_AFFILIATIONS);
        assert_eq!(c.journal_id, None);
        assert_eq!(c.pub_year, Some(1998));
        assert!(c.pub_types.is_empty());
    }

    #[test]
    fn test_unlabelled_sections_joined_with_space() {
        let xml = wrap(r#"
    <MedlineCitation Status="MEDLINE">
      <PMID>1</PMID>
      <Article>
        <ArticleTitle>T</ArticleTitle>
        <Abstract>
          <AbstractText>First part.</AbstractText>
          <AbstractText>Second part.</AbstractText>
          <AbstractText Label="CONCLUSIONS"/>
        </Abstract>
      </Article>
    </MedlineCitation>"#);

        let c = &parse_medline_xml(&xml).unwrap()[0];
        assert_eq!(c.abstract_text, "First part. Second part. CONCLUSIONS:");
    }

    #[test]
    fn test_unknown_year_and_status() {
        let xml = wrap(r#"
    <MedlineCitation>
      <PMID>2</PMID>
      <Article>
        <Journal><JournalIssue><PubDate><MedlineDate>Spring-Summer</MedlineDate></PubDate></JournalIssue></Journal>
      </Article>
    </MedlineCitation>"#);

        let c = &parse_medline_xml(&xml).unwrap()[0];
        assert_eq!(c.pub_year, None);
        assert_eq!(c.status, IndexingStatus::Unspecified);
        assert_eq!(c.title, "");
    }

    #[test]
    fn test_missing_pmid_is_fatal() {
        let xml = wrap(r#"<MedlineCitation Status="MEDLINE"><Article/></MedlineCitation>"#);
        let err = parse_medline_xml(&xml).unwrap_err();
        assert!(matches!(err, BmcsError::MalformedInput { .. }));
    }

    #[test]
    fn test_non_numeric_pmid_is_fatal() {
        let xml = wrap(r#"<MedlineCitation><PMID>abc</PMID></MedlineCitation>"#);
        assert!(matches!(
            parse_medline_xml(&xml),
            Err(BmcsError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_zero_pmid_is_fatal() {
        let xml = wrap(r#"<MedlineCitation><PMID>0</PMID></MedlineCitation>"#);
        let err = parse_medline_xml(&xml).unwrap_err();
        assert!(matches!(err, BmcsError::MalformedInput { ref reason, .. } if reason.contains("\"0\"")));
    }

    #[test]
    fn test_broken_xml_is_an_error() {
        let xml = "<PubmedArticleSet><PubmedArticle><MedlineCitation></PubmedArticle>";
        assert!(matches!(parse_medline_xml(xml), Err(BmcsError::Xml(_))));
    }

    #[test]
    fn test_records_outside_pubmed_article_ignored() {
        let xml = r#"<PubmedArticleSet>
            <PubmedBookArticle><MedlineCitation><PMID>5</PMID></MedlineCitation></PubmedBookArticle>
            <PubmedArticle><MedlineCitation Status="MEDLINE"><PMID>6</PMID></MedlineCitation></PubmedArticle>
        </PubmedArticleSet>"#;
        let citations = parse_medline_xml(xml).unwrap();
        assert_eq!(citations.iter().map(|c| c.pmid).collect::<Vec<_>>(), vec![6]);
    }
}
