//! # civicfix-indexer
//!
//! Turns a citizen submission into a persisted issue.
//!
//! - [`normalize`] is the acceptance boundary for classifier labels.
//! - [`document`] assembles the issue document and scores it.
//! - [`IssueIndexer`] runs the submission pipeline: context fan-out,
//!   classification, then all-or-nothing indexing.

pub mod document;
pub mod engine;
pub mod normalize;
pub mod settings;
pub mod submission;

pub use document::IssueMetadata;
pub use engine::IssueIndexer;
pub use normalize::normalize_labels;
pub use settings::IndexerSettings;
pub use submission::{IndexOutcome, SubmissionRequest};
