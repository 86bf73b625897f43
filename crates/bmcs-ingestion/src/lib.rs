//! bmcs-ingestion - Citation intake.
//! - MEDLINE XML extraction (daily update files)
//! - Publication year recovery from structured and free-text dates
//! - Eligibility filtering by status, journal and policy flags
//! - Labelled JSON datasets for evaluation runs

pub mod medline;
pub mod pub_date;
pub mod filter;
pub mod dataset;

pub use dataset::{drop_misindexed, load_labelled_dataset, LabelledCitation};
pub use filter::{evaluate, select_eligible, FilterDecision, FilterRule};
pub use medline::{parse_medline_xml, parse_update_file};
