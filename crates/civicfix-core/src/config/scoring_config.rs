use serde::{Deserialize, Serialize};

use super::defaults;

/// Impact scoring weights and shape parameters.
///
/// ```text
/// raw    = w_severity·sev/10 + w_upvotes·ln(1+u) − w_reports·ln(1+r)
///        + w_density·density + w_recency·e^(−age/tau)
/// impact = clamp(raw · 100 / normalizer, 0, 100)
/// radius = round(radius_base_m · (1 + radius_growth · ln(1 + impact)))
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub w_severity: f64,
    pub w_upvotes: f64,
    pub w_reports: f64,
    pub w_density: f64,
    pub w_recency: f64,
    /// Characteristic recency timescale in days.
    pub recency_tau_days: f64,
    /// Raw score that maps to an impact of 100.
    pub normalizer: f64,
    pub radius_base_m: f64,
    pub radius_growth: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            w_severity: defaults::DEFAULT_W_SEVERITY,
            w_upvotes: defaults::DEFAULT_W_UPVOTES,
            w_reports: defaults::DEFAULT_W_REPORTS,
            w_density: defaults::DEFAULT_W_DENSITY,
            w_recency: defaults::DEFAULT_W_RECENCY,
            recency_tau_days: defaults::DEFAULT_RECENCY_TAU_DAYS,
            normalizer: defaults::DEFAULT_SCORE_NORMALIZER,
            radius_base_m: defaults::DEFAULT_RADIUS_BASE_M,
            radius_growth: defaults::DEFAULT_RADIUS_GROWTH,
        }
    }
}
