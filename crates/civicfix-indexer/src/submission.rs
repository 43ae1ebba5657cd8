use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use civicfix_core::errors::ValidationError;
use civicfix_core::models::GeoPoint;

/// A citizen's report, as received from the upload layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// Reference to the already-uploaded photo.
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    pub location: GeoPoint,
    /// Report time. Defaults to now.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_selected_labels: Vec<String>,
    #[serde(default)]
    pub reported_by: Option<String>,
}

impl SubmissionRequest {
    /// Checks that need no external call.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.location.validate()?;
        if self.image_url.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "image_url".to_string(),
            });
        }
        Ok(())
    }
}

/// Terminal outcome of indexing. "No issues found" is a result, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IndexOutcome {
    Indexed { issue_id: String },
    NoIssuesFound,
}

impl IndexOutcome {
    pub fn issue_id(&self) -> Option<&str> {
        match self {
            Self::Indexed { issue_id } => Some(issue_id),
            Self::NoIssuesFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmissionRequest {
        SubmissionRequest {
            image_url: "https://storage.example/a.jpg".into(),
            description: String::new(),
            location: GeoPoint { lat: 28.6, lon: 77.2 },
            timestamp: None,
            user_selected_labels: vec![],
            reported_by: None,
        }
    }

    #[test]
    fn validation_catches_bad_location_and_missing_image() {
        assert!(request().validate().is_ok());

        let mut bad_location = request();
        bad_location.location.lat = 120.0;
        assert!(matches!(
            bad_location.validate(),
            Err(ValidationError::InvalidLocation { .. })
        ));

        let mut no_image = request();
        no_image.image_url = "  ".into();
        assert!(matches!(no_image.validate(), Err(ValidationError::EmptyField { .. })));
    }
}
