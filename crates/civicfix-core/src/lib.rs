//! # civicfix-core
//!
//! Foundation crate for the CivicFix scoring and evidence retrieval core.
//! Defines the issue/fix data model, boundary traits, errors, config,
//! the canonical label vocabulary, and the retry backoff policy.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod retry;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CivicConfig;
pub use errors::{CivicError, CivicResult};
pub use models::{DetectedIssueLabel, FixRecord, GeoPoint, Issue, IssueStatus};
pub use retry::BackoffPolicy;
