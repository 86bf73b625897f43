//! Eligibility filter: which parsed citations get scored at all.
//!
//! The policy is an ordered rule table evaluated top-down; the first rule
//! whose condition matches decides. No matching rule means excluded.
//!
//! | # | condition                                         | admits when                                              |
//! |---|---------------------------------------------------|----------------------------------------------------------|
//! | 1 | `predict_all`                                     | always                                                   |
//! | 2 | `!predict_medline` and status not MEDLINE/PnM     | selectively indexed and (`!journal_drop` or not misindexed) |
//! | 3 | `predict_medline` and status MEDLINE              | not selectively indexed (`journal_drop` ignored)          |

use tracing::{debug, info, instrument};

use bmcs_common::{BmcsError, Citation, IndexingStatus, JournalTables, PolicyFlags, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    PredictAll,
    PendingSelective,
    MedlineNonSelective,
}

impl FilterRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterRule::PredictAll          => "predict_all",
            FilterRule::PendingSelective    => "pending_selective",
            FilterRule::MedlineNonSelective => "medline_non_selective",
        }
    }
}

struct Rule {
    rule: FilterRule,
    applies: fn(&PolicyFlags, &Citation) -> bool,
    admits: fn(&PolicyFlags, &JournalTables, &Citation) -> bool,
}

const RULES: [Rule; 3] = [
    Rule {
        rule: FilterRule::PredictAll,
        applies: |flags, _| flags.predict_all,
        admits: |_, _, _| true,
    },
    Rule {
        rule: FilterRule::PendingSelective,
        applies: |flags, c| !flags.predict_medline && !c.status.is_settled(),
        admits: |flags, tables, c| {
            tables.is_selectively_indexed(c.journal_id())
                && (!flags.journal_drop || !tables.is_misindexed(c.journal_id()))
        },
    },
    Rule {
        // journal_drop has no effect here: this mode targets journals that
        // are not selectively indexed, so the misindexed list never applies.
        rule: FilterRule::MedlineNonSelective,
        applies: |flags, c| flags.predict_medline && c.status == IndexingStatus::Medline,
        admits: |_, tables, c| !tables.is_selectively_indexed(c.journal_id()),
    },
];

/// Outcome for one citation: the deciding rule (if any) and its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDecision {
    pub rule: Option<FilterRule>,
    pub eligible: bool,
}

pub fn evaluate(flags: &PolicyFlags, tables: &JournalTables, citation: &Citation) -> FilterDecision {
    RULES
        .iter()
        .find(|r| (r.applies)(flags, citation))
        .map(|r| FilterDecision {
            rule: Some(r.rule),
            eligible: (r.admits)(flags, tables, citation),
        })
        .unwrap_or(FilterDecision { rule: None, eligible: false })
}

/// Keep the eligible citations, in input order.
///
/// An empty result is `BmcsError::EmptyEligibleSet`: the batch must stop
/// rather than score nothing.
#[instrument(skip_all, fields(total = citations.len()))]
pub fn select_eligible(
    citations: Vec<Citation>,
    flags: &PolicyFlags,
    tables: &JournalTables,
) -> Result<Vec<Citation>> {
    let total = citations.len();
    let eligible: Vec<Citation> = citations
        .into_iter()
        .filter(|c| {
            let decision = evaluate(flags, tables, c);
            debug!(
                pmid = c.pmid,
                rule = decision.rule.map(|r| r.as_str()).unwrap_or("none"),
                eligible = decision.eligible,
                "Filter decision"
            );
            decision.eligible
        })
        .collect();

    info!(eligible = eligible.len(), total, "Citations selected for scoring");
    if eligible.is_empty() {
        return Err(BmcsError::EmptyEligibleSet);
    }
    Ok(eligible)
}
