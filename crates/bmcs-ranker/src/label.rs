use std::fmt;

use serde::{Deserialize, Serialize};

/// Final decision for one citation. The numeric code is what the
/// prediction file and the evaluation report carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeLabel {
    OutOfScope,
    AutoInScope,
    NeedsReview,
    SpecialReview,
}

impl ScopeLabel {
    pub fn code(&self) -> u8 {
        match self {
            ScopeLabel::OutOfScope    => 0,
            ScopeLabel::AutoInScope   => 1,
            ScopeLabel::NeedsReview   => 2,
            ScopeLabel::SpecialReview => 3,
        }
    }

    /// Recall-oriented reading: anything not confidently out.
    pub fn is_in_scope(&self) -> bool {
        matches!(self, ScopeLabel::AutoInScope | ScopeLabel::NeedsReview)
    }
}

impl fmt::Display for ScopeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
