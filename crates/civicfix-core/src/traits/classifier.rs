use crate::errors::UpstreamError;
use crate::models::{ClassificationRequest, ClassifierOutput};

/// External issue classifier (vision + language model).
#[allow(async_fn_in_trait)]
pub trait IIssueClassifier: Send + Sync {
    /// One classification attempt. Retries and timeouts are the caller's.
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassifierOutput, UpstreamError>;
}
