use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    Issue,
    Fix,
}

/// Compact, prompt-sized view of a past issue or fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSnippet {
    pub id: String,
    pub kind: EvidenceKind,
    pub labels: Vec<String>,
    #[serde(default)]
    pub severity_score: Option<f64>,
    #[serde(default)]
    pub co2_saved: Option<f64>,
    #[serde(default)]
    pub success_rate: Option<f64>,
    /// Truncated description or summary.
    pub excerpt: String,
    pub recorded_at: DateTime<Utc>,
}

/// Truncate to at most `max_chars` characters, on a char boundary.
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
