//! # civicfix-embeddings
//!
//! Turns issue and fix text into fixed-length vectors.
//!
//! - [`composition`] builds the deterministic text blob that gets embedded.
//! - [`providers`] holds the remote Gemini provider and the offline hashing
//!   provider.
//! - [`EmbeddingEngine`] adds caching, timeout, retry, and strict
//!   dimensionality checks. Its public entry points never fail: a missing
//!   vector is `None`, and callers degrade accordingly.

pub mod cache;
pub mod composition;
pub mod engine;
pub mod providers;

pub use engine::EmbeddingEngine;
pub use providers::{create_provider, ConfiguredProvider, GeminiProvider, HashingProvider};
