use crate::errors::UpstreamError;
use crate::models::{VerificationRequest, VerifierOutput};

/// External fix verifier.
#[allow(async_fn_in_trait)]
pub trait IFixVerifier: Send + Sync {
    /// One verification attempt. Retries and timeouts are the caller's.
    async fn verify(&self, request: &VerificationRequest) -> Result<VerifierOutput, UpstreamError>;
}
