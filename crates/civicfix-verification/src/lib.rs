//! # civicfix-verification
//!
//! Decides whether a submitted fix closes an issue.
//!
//! [`reconcile`] is the pure decision rule: every detected label must be
//! reported fully fixed, and anything missing or partial keeps the issue
//! open. [`FixVerificationOrchestrator`] wraps it with context retrieval,
//! the external verifier call, and the atomic close-or-record write.

pub mod orchestrator;
pub mod reconcile;
pub mod submission;

pub use orchestrator::{FixVerificationOrchestrator, VerificationSettings};
pub use reconcile::{label_outcomes, reconcile, unresolved_labels, IssueStatusUpdate};
pub use submission::{FixSubmission, VerificationReport};
