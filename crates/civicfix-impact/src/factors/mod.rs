pub mod density;
pub mod engagement;
pub mod recency;
pub mod severity;

use chrono::{DateTime, Utc};

use civicfix_core::models::Issue;

/// Raw scoring inputs. Counters are signed so that callers holding
/// deltas or untrusted values can pass them through; negatives count as 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactInputs {
    pub severity_score: f64,
    pub upvotes_total: i64,
    pub reports_total: i64,
    pub created_at: DateTime<Utc>,
    /// Normalized local issue density in [0, 1].
    pub density_norm: f64,
}

impl ImpactInputs {
    /// Inputs for an existing issue, summing counters across status buckets.
    pub fn from_issue(issue: &Issue, density_norm: f64) -> Self {
        Self {
            severity_score: issue.severity_score,
            upvotes_total: saturating_i64(issue.upvotes.total()),
            reports_total: saturating_i64(issue.reports.total()),
            created_at: issue.created_at,
            density_norm,
        }
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Context for impact evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ImpactContext {
    /// Reference time for recency.
    pub now: DateTime<Utc>,
}

impl ImpactContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Default for ImpactContext {
    fn default() -> Self {
        Self { now: Utc::now() }
    }
}
