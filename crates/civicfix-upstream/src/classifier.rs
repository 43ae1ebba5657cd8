use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use civicfix_core::config::UpstreamConfig;
use civicfix_core::errors::UpstreamError;
use civicfix_core::models::{ClassificationRequest, ClassifierOutput, EvidenceSnippet, GeoPoint};
use civicfix_core::traits::IIssueClassifier;

use crate::transport::{HttpClient, HttpClientConfig};

pub const CLASSIFIER_SERVICE: &str = "classifier";

/// Request body for `POST /analyze`.
#[derive(Debug, Serialize)]
struct AnalyzeBody<'a> {
    image_url: &'a str,
    location: GeoPoint,
    timestamp: DateTime<Utc>,
    description: &'a str,
    user_selected_labels: &'a [String],
    evidence: &'a [EvidenceSnippet],
    weather_context: Option<String>,
}

/// Classifier reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    http: HttpClient,
}

impl HttpClassifier {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = HttpClient::new(HttpClientConfig::new(
            CLASSIFIER_SERVICE,
            &config.classifier_url,
            std::time::Duration::from_secs(config.classifier_timeout_secs),
        ))?;
        Ok(Self::new(http))
    }
}

impl IIssueClassifier for HttpClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassifierOutput, UpstreamError> {
        let body = AnalyzeBody {
            image_url: &request.image_url,
            location: request.location,
            timestamp: request.timestamp,
            description: &request.description,
            user_selected_labels: &request.user_selected_labels,
            evidence: &request.evidence,
            weather_context: request.weather.as_ref().map(|w| w.describe()),
        };
        info!(
            evidence = request.evidence.len(),
            has_weather = request.weather.is_some(),
            "sending issue to classifier"
        );
        self.http.post_json("analyze", &body).await
    }
}
