use serde::{Deserialize, Serialize};

/// Derived prominence of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    /// In [0, 100].
    pub impact_score: f64,
    /// At least the base radius (100 m by default).
    pub visibility_radius_m: u32,
}
