//! # civicfix-runtime
//!
//! Owns every engine in the workspace, built once from a [`CivicConfig`],
//! and exposes one call per upstream endpoint: issue submission, community
//! engagement, fix submission, nearby listing, and impact recomputation.
//!
//! [`CivicConfig`]: civicfix_core::CivicConfig

pub mod facade;
pub mod tracing_setup;

pub use facade::{CivicFix, DefaultCivicFix};
pub use tracing_setup::init_tracing;
