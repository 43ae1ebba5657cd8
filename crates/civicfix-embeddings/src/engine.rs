//! EmbeddingEngine: the main entry point for civicfix-embeddings.
//!
//! Wraps one provider with caching, a per-attempt timeout, bounded retry,
//! and strict dimensionality validation. Mismatched vectors are rejected,
//! never padded or truncated.

use std::time::Duration;

use tracing::{debug, info, warn};

use civicfix_core::config::EmbeddingConfig;
use civicfix_core::errors::EmbeddingError;
use civicfix_core::models::{FixRecord, Issue};
use civicfix_core::retry::BackoffPolicy;
use civicfix_core::traits::IEmbeddingProvider;
use civicfix_upstream::with_retry;

use crate::cache::{self, L1MemoryCache};
use crate::composition;

pub struct EmbeddingEngine<P> {
    provider: P,
    cache: L1MemoryCache,
    dimensions: usize,
    timeout: Duration,
    retry: BackoffPolicy,
}

impl<P: IEmbeddingProvider> EmbeddingEngine<P> {
    pub fn new(provider: P, config: &EmbeddingConfig, retry: BackoffPolicy) -> Self {
        info!(
            provider = provider.name(),
            dims = config.dimensions,
            cache_size = config.cache_size,
            "EmbeddingEngine initialized"
        );
        if provider.dimensions() != config.dimensions {
            warn!(
                provider = provider.name(),
                provider_dims = provider.dimensions(),
                expected_dims = config.dimensions,
                "provider dimensionality differs from configured; its vectors will be rejected"
            );
        }
        Self {
            provider,
            cache: L1MemoryCache::new(config.cache_size),
            dimensions: config.dimensions,
            timeout: Duration::from_secs(config.timeout_secs),
            retry,
        }
    }

    /// Expected vector length.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Whether `vector` has the expected shape for search.
    pub fn accepts(&self, vector: &[f32]) -> bool {
        vector.len() == self.dimensions && vector.iter().all(|v| v.is_finite())
    }

    /// Embed `text`, surfacing the failure reason.
    pub async fn try_embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let key = cache::content_key(text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(hash = %key, "embedding cache hit");
            return Ok(hit);
        }

        let vector = with_retry(self.provider.name(), &self.retry, self.timeout, || {
            self.provider.embed(text)
        })
        .await?;
        self.validate(&vector)?;

        self.cache.insert(key, vector.clone());
        Ok(vector)
    }

    fn validate(&self, vector: &[f32]) -> Result<(), EmbeddingError> {
        if vector.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        if let Some(idx) = vector.iter().position(|v| !v.is_finite()) {
            return Err(EmbeddingError::InvalidVector {
                reason: format!("non-finite component at index {idx}"),
            });
        }
        Ok(())
    }

    /// Embed `text`, or `None` on any failure. The failure is logged.
    pub async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        match self.try_embed(text).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "embedding unavailable, continuing without vector"
                );
                None
            }
        }
    }

    /// Document vector for an issue.
    pub async fn embed_issue(&self, issue: &Issue) -> Option<Vec<f32>> {
        self.embed(&composition::compose_issue_text(issue)).await
    }

    /// Query vector for a new submission.
    pub async fn embed_query(&self, description: &str, hinted_labels: &[String]) -> Option<Vec<f32>> {
        self.embed(&composition::compose_query_text(description, hinted_labels))
            .await
    }

    /// Query vector for a proposed fix.
    pub async fn embed_fix_query(&self, fix_description: &str, issue_types: &[String]) -> Option<Vec<f32>> {
        self.embed(&composition::compose_fix_query_text(fix_description, issue_types))
            .await
    }

    /// Document vector for a fix.
    pub async fn embed_fix(&self, fix: &FixRecord) -> Option<Vec<f32>> {
        self.embed(&composition::compose_fix_text(fix)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use civicfix_core::errors::UpstreamError;

    use super::*;

    struct FixedProvider {
        dims: usize,
        output_len: usize,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn new(dims: usize, output_len: usize) -> Self {
            Self {
                dims,
                output_len,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl IEmbeddingProvider for FixedProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0.5; self.output_len])
        }
        fn dimensions(&self) -> usize {
            self.dims
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingProvider {
        calls: AtomicUsize,
    }

    impl IEmbeddingProvider for FailingProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(EmbeddingError::Request(UpstreamError::Unreachable {
                service: "embedding".into(),
                reason: "connection refused".into(),
            }))
        }
        fn dimensions(&self) -> usize {
            8
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    fn config(dims: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            dimensions: dims,
            cache_size: 100,
            ..EmbeddingConfig::default()
        }
    }

    fn fast_retry() -> BackoffPolicy {
        BackoffPolicy::new(3, Duration::from_millis(1), Duration::from_millis(2))
    }

    #[tokio::test]
    async fn valid_vectors_are_cached() {
        let engine = EmbeddingEngine::new(FixedProvider::new(8, 8), &config(8), fast_retry());
        assert_eq!(engine.embed("pothole").await.unwrap().len(), 8);
        assert_eq!(engine.embed("pothole").await.unwrap().len(), 8);
        assert_eq!(engine.provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wrong_dimensionality_is_none_not_padded() {
        let engine = EmbeddingEngine::new(FixedProvider::new(8, 6), &config(8), fast_retry());
        assert!(engine.embed("pothole").await.is_none());
        let err = engine.try_embed("pothole").await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 8, actual: 6 }
        ));
    }

    #[tokio::test]
    async fn transient_failures_are_retried_then_swallowed() {
        let engine = EmbeddingEngine::new(
            FailingProvider {
                calls: AtomicUsize::new(0),
            },
            &config(8),
            fast_retry(),
        );
        assert!(engine.embed("pothole").await.is_none());
        assert_eq!(engine.provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_input_skips_provider() {
        let engine = EmbeddingEngine::new(FixedProvider::new(8, 8), &config(8), fast_retry());
        assert!(engine.embed("   ").await.is_none());
        assert_eq!(engine.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn accepts_checks_shape() {
        let engine = EmbeddingEngine::new(FixedProvider::new(4, 4), &config(4), fast_retry());
        assert!(engine.accepts(&[0.1, 0.2, 0.3, 0.4]));
        assert!(!engine.accepts(&[0.1, 0.2]));
        assert!(!engine.accepts(&[0.1, f32::NAN, 0.3, 0.4]));
    }
}
