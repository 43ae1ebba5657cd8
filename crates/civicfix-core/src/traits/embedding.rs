use crate::errors::EmbeddingError;

/// Text embedding provider.
#[allow(async_fn_in_trait)]
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text. Implementations return whatever the backend
    /// produced; dimensionality is enforced by the caller.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// The dimensionality this provider is configured to produce.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
