//! bmcs-common - Shared types, errors, and static tables used across all BmCS crates.

pub mod error;
pub mod citation;
pub mod journals;
pub mod thresholds;
pub mod policy;

// Re-export commonly used types
pub use citation::{Citation, IndexingStatus};
pub use error::{BmcsError, Result};
pub use journals::{JournalGroup, JournalTables};
pub use policy::{PolicyFlags, RunMode};
pub use thresholds::{exceeds, GroupCutoffs, ThresholdConfig};
