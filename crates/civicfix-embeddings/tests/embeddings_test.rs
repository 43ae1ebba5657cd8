use std::time::Duration;

use civicfix_core::config::EmbeddingConfig;
use civicfix_core::retry::BackoffPolicy;
use civicfix_embeddings::{create_provider, EmbeddingEngine, HashingProvider};

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (na * nb)
}

fn small_config() -> EmbeddingConfig {
    EmbeddingConfig {
        provider: "hashing".into(),
        dimensions: 256,
        cache_size: 64,
        ..EmbeddingConfig::default()
    }
}

#[tokio::test]
async fn hashing_engine_produces_unit_vectors_of_configured_length() {
    let config = small_config();
    let engine = EmbeddingEngine::new(create_provider(&config), &config, BackoffPolicy::none());
    assert_eq!(engine.provider_name(), "hashing");

    let v = engine.embed("Issue -- deep pothole near bus stop").await.unwrap();
    assert_eq!(v.len(), 256);
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn related_text_scores_higher_than_unrelated() {
    let config = small_config();
    let engine = EmbeddingEngine::new(
        HashingProvider::new(config.dimensions),
        &config,
        BackoffPolicy::none(),
    );
    let query = engine
        .embed_query("pothole on main road", &["pothole".to_string()])
        .await
        .unwrap();
    let near = engine.embed("Issue -- large pothole on the main road").await.unwrap();
    let far = engine.embed("Fix -- graffiti removed from wall").await.unwrap();
    assert!(cosine(&query, &near) > cosine(&query, &far));
}

#[tokio::test]
async fn hashing_vectors_are_rejected_by_a_larger_index() {
    let config = small_config();
    let expecting_more = EmbeddingConfig {
        dimensions: 512,
        ..small_config()
    };
    let engine = EmbeddingEngine::new(
        HashingProvider::new(config.dimensions),
        &expecting_more,
        BackoffPolicy::none(),
    );
    assert!(engine.embed("pothole").await.is_none());
}

#[tokio::test]
async fn unreachable_gemini_yields_none() {
    let config = EmbeddingConfig {
        provider: "gemini".into(),
        api_base: "http://127.0.0.1:9".into(),
        api_key: Some("test-key".into()),
        timeout_secs: 2,
        dimensions: 8,
        ..EmbeddingConfig::default()
    };
    let engine = EmbeddingEngine::new(
        create_provider(&config),
        &config,
        BackoffPolicy::new(2, Duration::from_millis(1), Duration::from_millis(1)),
    );
    assert_eq!(engine.provider_name(), "gemini");
    assert!(engine.embed("pothole").await.is_none());
}
