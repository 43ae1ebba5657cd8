use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use civicfix_core::errors::ValidationError;
use civicfix_core::models::{FixAttempt, FixRecord, Issue, OutcomeHint, OverallOutcome};

/// A claimed fix, with after-photos already uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixSubmission {
    pub issue_id: String,
    pub submitted_by: String,
    #[serde(default)]
    pub fix_description: String,
    pub image_urls: Vec<String>,
    /// Defaults to now.
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl FixSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("issue_id", self.issue_id.trim().is_empty()),
            ("submitted_by", self.submitted_by.trim().is_empty()),
            (
                "image_urls",
                self.image_urls.iter().all(|u| u.trim().is_empty()),
            ),
        ];
        match required.iter().find(|(_, empty)| *empty) {
            Some((field, _)) => Err(ValidationError::EmptyField {
                field: field.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Result of one verification round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub outcome: OverallOutcome,
    /// What the verifier suggested, for comparison.
    pub verifier_hint: Option<OutcomeHint>,
    /// Labels that kept the issue open. Empty when closed.
    pub unresolved_labels: Vec<String>,
    /// Issue state after the round.
    pub issue: Issue,
    /// Present when the fix closed the issue.
    pub fix: Option<FixRecord>,
    pub attempt: FixAttempt,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> FixSubmission {
        FixSubmission {
            issue_id: "i-1".into(),
            submitted_by: "ngo-1".into(),
            fix_description: "Cleared".into(),
            image_urls: vec!["https://storage.example/after.jpg".into()],
            submitted_at: None,
        }
    }

    #[test]
    fn requires_issue_submitter_and_photos() {
        assert!(submission().validate().is_ok());

        let mut no_photos = submission();
        no_photos.image_urls = vec![" ".into()];
        assert!(matches!(
            no_photos.validate(),
            Err(ValidationError::EmptyField { field }) if field == "image_urls"
        ));

        let mut anonymous = submission();
        anonymous.submitted_by.clear();
        assert!(matches!(
            anonymous.validate(),
            Err(ValidationError::EmptyField { field }) if field == "submitted_by"
        ));
    }
}
