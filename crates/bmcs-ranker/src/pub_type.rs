//! Publication types routed to special review.

use bmcs_common::Citation;

/// Lower-case substrings that mark a title as a correction, comment, etc.
pub const PUB_STRINGS: [&str; 17] = [
    "author correction",
    "comment",
    "corrigend",
    "corrigendum",
    "correction",
    "correction to",
    "department of error",
    "errata",
    "errata corrige",
    "erratum",
    "publisher correction",
    "publisher",
    "reply",
    "retracted",
    "retraction",
    "retraction note",
    "retraction notice",
];

/// Exact `PublicationType` values.
pub const PUB_TYPES: [&str; 3] = ["Retraction of Publication", "Case Reports", "Comment"];

pub fn is_flagged_publication(citation: &Citation) -> bool {
    let title = citation.title.to_lowercase();
    PUB_STRINGS.iter().any(|s| title.contains(s))
        || citation.pub_types.iter().any(|t| PUB_TYPES.contains(&t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmcs_test_utils::CitationBuilder;

    #[test]
    fn test_title_match_is_case_insensitive() {
        assert!(is_flagged_publication(&CitationBuilder::new(1).title("ERRATUM: Foo").build()));
        assert!(is_flagged_publication(&CitationBuilder::new(1).title("Reply to Smith et al.").build()));
        assert!(!is_flagged_publication(&CitationBuilder::new(1).title("Foo and bar").build()));
    }

    #[test]
    fn test_pub_type_match_is_exact() {
        assert!(is_flagged_publication(&CitationBuilder::new(1).pub_type("Case Reports").build()));
        assert!(!is_flagged_publication(&CitationBuilder::new(1).pub_type("case reports").build()));
        assert!(!is_flagged_publication(&CitationBuilder::new(1).pub_type("Journal Article").build()));
    }
}
