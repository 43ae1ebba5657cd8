//! # civicfix-impact
//!
//! Impact scoring for civic issues: a weighted sum of severity, log-damped
//! engagement, local density, and exponential recency, normalized to
//! [0, 100], plus a logarithmic visibility radius derived from it.
//!
//! Everything here is pure. Inputs are sanitized and clamped, never
//! rejected.

pub mod engine;
pub mod factors;
pub mod formula;

pub use engine::ImpactEngine;
pub use factors::{ImpactContext, ImpactInputs};
pub use formula::{compute_impact, ImpactBreakdown};
