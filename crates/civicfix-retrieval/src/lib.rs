//! # civicfix-retrieval
//!
//! Grounding evidence for the classifier and the fix verifier.
//!
//! [`RetrievalStrategy`] is chosen once per call from the query embedding:
//! `VectorFiltered` when a well-shaped vector is available, `FilteredOnly`
//! otherwise. Either way it produces one store query description, executed
//! by a single path. [`EvidenceRetriever`] never fails: store errors and
//! timeouts become an empty result.

pub mod engine;
pub mod snippets;
pub mod strategy;

pub use engine::EvidenceRetriever;
pub use strategy::RetrievalStrategy;
