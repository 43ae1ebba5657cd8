use serde::Serialize;
use tracing::info;

use civicfix_core::config::UpstreamConfig;
use civicfix_core::errors::UpstreamError;
use civicfix_core::models::{EvidenceSnippet, VerificationRequest, VerifierOutput};
use civicfix_core::traits::IFixVerifier;

use crate::transport::{HttpClient, HttpClientConfig};

pub const VERIFIER_SERVICE: &str = "verifier";

/// Request body for `POST /verify-fix`.
#[derive(Debug, Serialize)]
struct VerifyBody<'a> {
    issue_id: &'a str,
    before_image_url: Option<&'a str>,
    after_image_urls: &'a [String],
    issue_description: &'a str,
    fix_description: &'a str,
    detected_issue_types: &'a [String],
    similar_fixes: &'a [EvidenceSnippet],
}

/// Fix verifier reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    http: HttpClient,
}

impl HttpVerifier {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = HttpClient::new(HttpClientConfig::new(
            VERIFIER_SERVICE,
            &config.verifier_url,
            std::time::Duration::from_secs(config.verifier_timeout_secs),
        ))?;
        Ok(Self::new(http))
    }
}

impl IFixVerifier for HttpVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerifierOutput, UpstreamError> {
        let body = VerifyBody {
            issue_id: &request.issue_id,
            before_image_url: request.before_image_url.as_deref(),
            after_image_urls: &request.after_image_urls,
            issue_description: &request.issue_description,
            fix_description: &request.fix_description,
            detected_issue_types: &request.detected_types,
            similar_fixes: &request.context,
        };
        info!(
            issue_id = %request.issue_id,
            photos = request.after_image_urls.len(),
            context = request.context.len(),
            "sending fix to verifier"
        );
        self.http.post_json("verify-fix", &body).await
    }
}
