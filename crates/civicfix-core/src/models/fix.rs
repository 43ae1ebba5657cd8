use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FixedState, OutcomeHint, OverallOutcome};

/// Per-label outcome recorded on a fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixOutcome {
    pub issue_type: String,
    pub fixed: FixedState,
    pub confidence: f64,
    #[serde(default)]
    pub notes: String,
}

/// A verified fix. Written once when a fix closes an issue, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixRecord {
    pub fix_id: String,
    pub issue_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub photo_count: usize,
    pub co2_saved: f64,
    /// In [0, 1].
    pub success_rate: f64,
    pub related_issue_types: Vec<String>,
    pub fix_outcomes: Vec<FixOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_embedding: Option<Vec<f32>>,
    /// Past fixes shown to the verifier as context.
    #[serde(default)]
    pub source_doc_ids: Vec<String>,
}

/// One verification attempt, kept for audit whatever the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixAttempt {
    pub attempt_id: String,
    pub issue_id: String,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
    pub fix_description: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub outcome: OverallOutcome,
    pub verifier_hint: Option<OutcomeHint>,
    pub fix_outcomes: Vec<FixOutcome>,
    /// Set when the attempt produced a fix record.
    #[serde(default)]
    pub fix_id: Option<String>,
}
