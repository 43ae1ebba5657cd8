use std::time::Duration;

use chrono::Utc;

use civicfix_core::config::UpstreamConfig;
use civicfix_core::errors::UpstreamError;
use civicfix_core::models::{ClassificationRequest, GeoPoint, VerificationRequest};
use civicfix_core::retry::BackoffPolicy;
use civicfix_core::traits::{IFixVerifier, IIssueClassifier};
use civicfix_upstream::{with_retry, HttpClassifier, HttpVerifier};

fn dead_endpoints() -> UpstreamConfig {
    UpstreamConfig {
        classifier_url: "http://127.0.0.1:9".into(),
        verifier_url: "http://127.0.0.1:9/".into(),
        classifier_timeout_secs: 2,
        verifier_timeout_secs: 2,
        ..UpstreamConfig::default()
    }
}

fn classification_request() -> ClassificationRequest {
    ClassificationRequest {
        image_url: "https://storage.example/issue.jpg".into(),
        description: "Garbage piling up".into(),
        location: GeoPoint { lat: 18.52, lon: 73.85 },
        timestamp: Utc::now(),
        user_selected_labels: vec![],
        evidence: vec![],
        weather: None,
    }
}

#[tokio::test]
async fn unreachable_classifier_fails_after_bounded_retries() {
    let classifier = HttpClassifier::from_config(&dead_endpoints()).unwrap();
    let request = classification_request();
    let policy = BackoffPolicy::new(2, Duration::from_millis(1), Duration::from_millis(2));
    let err = with_retry("classifier", &policy, Duration::from_secs(3), || {
        classifier.classify(&request)
    })
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        UpstreamError::Unreachable { .. } | UpstreamError::Timeout { .. }
    ));
    assert_eq!(err.service(), "classifier");
}

#[tokio::test]
async fn unreachable_verifier_is_transient() {
    let verifier = HttpVerifier::from_config(&dead_endpoints()).unwrap();
    let request = VerificationRequest {
        issue_id: "issue-1".into(),
        before_image_url: None,
        after_image_urls: vec!["https://storage.example/after.jpg".into()],
        issue_description: "Overflowing bin".into(),
        fix_description: "Bin emptied".into(),
        detected_types: vec!["overflowing_garbage_bin".into()],
        context: vec![],
    };
    let err = verifier.verify(&request).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(err.service(), "verifier");
}
