use serde::{Deserialize, Serialize};

use super::EvidenceSnippet;

/// Verifier judgement for one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedState {
    Yes,
    Partial,
    No,
}

impl FixedState {
    /// Only a full fix counts. `Partial` leaves the hazard in place.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Partial => "partial",
            Self::No => "no",
        }
    }
}

/// Authoritative disposition derived by reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallOutcome {
    Closed,
    Rejected,
}

/// What the verifier suggests. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeHint {
    Closed,
    Partial,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerIssueResult {
    pub issue_type: String,
    #[serde(default)]
    pub original_confidence: Option<f64>,
    pub fixed: FixedState,
    #[serde(default)]
    pub confidence: f64,
    /// Indices into the submitted after-photos that show this label.
    #[serde(default)]
    pub evidence_photos: Vec<usize>,
    #[serde(default)]
    pub notes: String,
}

/// Structured verifier response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifierOutput {
    #[serde(default)]
    pub fix_summary: String,
    pub per_issue_results: Vec<PerIssueResult>,
    #[serde(default, alias = "overall_outcome")]
    pub overall_outcome_hint: Option<OutcomeHint>,
    #[serde(default)]
    pub suggested_success_rate: f64,
}

/// Everything the verifier receives for one fix submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub issue_id: String,
    #[serde(default)]
    pub before_image_url: Option<String>,
    pub after_image_urls: Vec<String>,
    pub issue_description: String,
    pub fix_description: String,
    /// Label types the verifier must assess.
    pub detected_types: Vec<String>,
    /// Similar past fixes for grounding.
    #[serde(default)]
    pub context: Vec<EvidenceSnippet>,
}
