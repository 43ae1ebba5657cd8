use serde::{Deserialize, Serialize};

/// One accepted classifier label, as persisted on an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIssueLabel {
    /// Normalized label name (lowercase, underscores).
    #[serde(rename = "type")]
    pub label_type: String,
    /// Classifier confidence in [0, 1].
    pub confidence: f64,
    /// Severity in [0, 10].
    pub severity_score: f64,
    #[serde(default)]
    pub future_impact: String,
    #[serde(default)]
    pub predicted_fix: String,
    #[serde(default)]
    pub predicted_fix_confidence: f64,
    /// Medium-confidence labels that need human review.
    #[serde(default)]
    pub auto_review_flag: bool,
}
