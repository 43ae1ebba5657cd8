pub mod gemini;
pub mod hashing;

pub use gemini::GeminiProvider;
pub use hashing::HashingProvider;

use tracing::warn;

use civicfix_core::config::EmbeddingConfig;
use civicfix_core::errors::EmbeddingError;
use civicfix_core::traits::IEmbeddingProvider;

/// Provider selected from configuration.
pub enum ConfiguredProvider {
    Gemini(GeminiProvider),
    Hashing(HashingProvider),
}

impl IEmbeddingProvider for ConfiguredProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match self {
            Self::Gemini(p) => p.embed(text).await,
            Self::Hashing(p) => p.embed(text).await,
        }
    }

    fn dimensions(&self) -> usize {
        match self {
            Self::Gemini(p) => p.dimensions(),
            Self::Hashing(p) => p.dimensions(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Gemini(p) => p.name(),
            Self::Hashing(p) => p.name(),
        }
    }
}

/// Build the configured provider. A Gemini config without an API key
/// falls back to hashing so the system still runs, degraded.
pub fn create_provider(config: &EmbeddingConfig) -> ConfiguredProvider {
    match config.provider.as_str() {
        "gemini" => match config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => match GeminiProvider::new(config, key.to_string()) {
                Ok(provider) => ConfiguredProvider::Gemini(provider),
                Err(e) => {
                    warn!(error = %e, "gemini provider unavailable, falling back to hashing");
                    ConfiguredProvider::Hashing(HashingProvider::new(config.dimensions))
                }
            },
            None => {
                warn!("no embedding API key configured, falling back to hashing");
                ConfiguredProvider::Hashing(HashingProvider::new(config.dimensions))
            }
        },
        _ => ConfiguredProvider::Hashing(HashingProvider::new(config.dimensions)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_falls_back_to_hashing() {
        let provider = create_provider(&EmbeddingConfig::default());
        assert_eq!(provider.name(), "hashing");
        assert_eq!(provider.dimensions(), 3072);
    }

    #[test]
    fn gemini_with_key() {
        let config = EmbeddingConfig {
            api_key: Some("test-key".into()),
            ..EmbeddingConfig::default()
        };
        assert_eq!(create_provider(&config).name(), "gemini");
    }
}
