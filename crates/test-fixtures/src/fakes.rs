//! Fakes for the boundary traits.
//!
//! Upstream fakes play a script of responses, falling back to a default
//! once the script is exhausted, and count their calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use civicfix_core::config::EngagementConfig;
use civicfix_core::errors::{CivicResult, EmbeddingError, StorageError, UpstreamError};
use civicfix_core::models::{
    ClassificationRequest, ClassifierOutput, EngagementAction, EngagementOutcome, FixAttempt,
    FixQuery, FixRecord, GeoPoint, Issue, IssueQuery, NearbyPage, PageRequest,
    VerificationRequest, VerifierOutput, WeatherSummary,
};
use civicfix_core::traits::{
    IEmbeddingProvider, IEvidenceStore, IFixVerifier, IIssueClassifier, IWeatherProvider,
    RescoreFn,
};

/// Failure kinds a fake can produce. Each call builds a fresh error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamFailure {
    Unreachable,
    Timeout,
    Status(u16),
    InvalidResponse,
}

impl UpstreamFailure {
    pub fn to_error(self, service: &str) -> UpstreamError {
        let service = service.to_string();
        match self {
            Self::Unreachable => UpstreamError::Unreachable {
                service,
                reason: "connection refused".into(),
            },
            Self::Timeout => UpstreamError::Timeout {
                service,
                timeout_secs: 1,
            },
            Self::Status(status) => UpstreamError::Status {
                service,
                status,
                body: "fake upstream rejection".into(),
            },
            Self::InvalidResponse => UpstreamError::InvalidResponse {
                service,
                reason: "missing field `detected_issues`".into(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Respond(T),
    Fail(UpstreamFailure),
    /// Respond after a delay.
    Delay(Duration, T),
    /// Never complete.
    Hang,
}

struct Script<T> {
    queue: Mutex<VecDeque<Scripted<T>>>,
    fallback: Scripted<T>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    fn new(steps: Vec<Scripted<T>>, fallback: Scripted<T>) -> Self {
        Self {
            queue: Mutex::new(steps.into()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    async fn play(&self, service: &str) -> Result<T, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .queue
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| self.fallback.clone());
        match step {
            Scripted::Respond(value) => Ok(value),
            Scripted::Fail(failure) => Err(failure.to_error(service)),
            Scripted::Delay(delay, value) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
            Scripted::Hang => std::future::pending().await,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub struct FakeClassifier {
    script: Script<ClassifierOutput>,
    requests: Mutex<Vec<ClassificationRequest>>,
}

impl FakeClassifier {
    pub fn returning(output: ClassifierOutput) -> Self {
        Self::scripted(vec![], Scripted::Respond(output))
    }

    pub fn failing(failure: UpstreamFailure) -> Self {
        Self::scripted(vec![], Scripted::Fail(failure))
    }

    pub fn scripted(steps: Vec<Scripted<ClassifierOutput>>, fallback: Scripted<ClassifierOutput>) -> Self {
        Self {
            script: Script::new(steps, fallback),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.script.calls()
    }

    /// Most recent request received.
    pub fn last_request(&self) -> Option<ClassificationRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

impl IIssueClassifier for FakeClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassifierOutput, UpstreamError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.script.play("classifier").await
    }
}

pub struct FakeVerifier {
    script: Script<VerifierOutput>,
    requests: Mutex<Vec<VerificationRequest>>,
}

impl FakeVerifier {
    pub fn returning(output: VerifierOutput) -> Self {
        Self::scripted(vec![], Scripted::Respond(output))
    }

    pub fn failing(failure: UpstreamFailure) -> Self {
        Self::scripted(vec![], Scripted::Fail(failure))
    }

    pub fn scripted(steps: Vec<Scripted<VerifierOutput>>, fallback: Scripted<VerifierOutput>) -> Self {
        Self {
            script: Script::new(steps, fallback),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.script.calls()
    }

    pub fn last_request(&self) -> Option<VerificationRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

impl IFixVerifier for FakeVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerifierOutput, UpstreamError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.script.play("verifier").await
    }
}

pub struct FakeWeather {
    script: Script<Option<WeatherSummary>>,
}

impl FakeWeather {
    pub fn returning(summary: Option<WeatherSummary>) -> Self {
        Self {
            script: Script::new(vec![], Scripted::Respond(summary)),
        }
    }

    pub fn scripted(step: Scripted<Option<WeatherSummary>>) -> Self {
        Self {
            script: Script::new(vec![], step),
        }
    }

    pub fn calls(&self) -> usize {
        self.script.calls()
    }
}

impl IWeatherProvider for FakeWeather {
    async fn summary(
        &self,
        _location: GeoPoint,
        _at: DateTime<Utc>,
    ) -> Result<Option<WeatherSummary>, UpstreamError> {
        self.script.play("weather").await
    }
}

/// Deterministic embedding provider. Texts containing a registered pattern
/// get the registered vector; everything else gets a bag-of-words hash.
pub struct FakeEmbeddingProvider {
    dims: usize,
    output_len: usize,
    failure: Option<UpstreamFailure>,
    rules: Vec<(String, Vec<f32>)>,
    calls: AtomicUsize,
}

impl FakeEmbeddingProvider {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            output_len: dims,
            failure: None,
            rules: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Declares `dims` but emits vectors of `output_len`.
    pub fn misshapen(dims: usize, output_len: usize) -> Self {
        Self {
            output_len,
            ..Self::new(dims)
        }
    }

    pub fn failing(dims: usize, failure: UpstreamFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new(dims)
        }
    }

    pub fn with_rule(mut self, pattern: &str, vector: Vec<f32>) -> Self {
        self.rules.push((pattern.to_string(), vector));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hash_vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.output_len];
        if self.output_len == 0 {
            return v;
        }
        for word in text.split_whitespace() {
            let h = word
                .bytes()
                .fold(0xcbf29ce484222325u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x100000001b3));
            v[(h % self.output_len as u64) as usize] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl IEmbeddingProvider for FakeEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(EmbeddingError::Request(failure.to_error("embedding")));
        }
        if let Some((_, vector)) = self.rules.iter().find(|(p, _)| text.contains(p.as_str())) {
            return Ok(vector.clone());
        }
        Ok(self.hash_vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn unreachable_store() -> civicfix_core::errors::CivicError {
    StorageError::SqliteError {
        message: "evidence store unreachable".into(),
    }
    .into()
}

/// A store whose every call fails.
pub struct FailingStore;

impl IEvidenceStore for FailingStore {
    async fn insert_issue(&self, _issue: &Issue) -> CivicResult<()> {
        Err(unreachable_store())
    }
    async fn get_issue(&self, _issue_id: &str) -> CivicResult<Option<Issue>> {
        Err(unreachable_store())
    }
    async fn search_issues(&self, _query: &IssueQuery) -> CivicResult<Vec<Issue>> {
        Err(unreachable_store())
    }
    async fn list_issues_near(
        &self,
        _center: GeoPoint,
        _radius_m: f64,
        _page: PageRequest,
    ) -> CivicResult<NearbyPage> {
        Err(unreachable_store())
    }
    async fn apply_engagement(
        &self,
        _issue_id: &str,
        _action: EngagementAction,
        _thresholds: &EngagementConfig,
        _rescore: &RescoreFn,
    ) -> CivicResult<EngagementOutcome> {
        Err(unreachable_store())
    }
    async fn refresh_impact(&self, _issue_id: &str, _rescore: &RescoreFn) -> CivicResult<Issue> {
        Err(unreachable_store())
    }
    async fn close_with_fix(&self, _fix: &FixRecord, _closed_at: DateTime<Utc>) -> CivicResult<Issue> {
        Err(unreachable_store())
    }
    async fn get_fix(&self, _fix_id: &str) -> CivicResult<Option<FixRecord>> {
        Err(unreachable_store())
    }
    async fn search_fixes(&self, _query: &FixQuery) -> CivicResult<Vec<FixRecord>> {
        Err(unreachable_store())
    }
    async fn record_fix_attempt(&self, _attempt: &FixAttempt) -> CivicResult<()> {
        Err(unreachable_store())
    }
    async fn fix_attempts_for(&self, _issue_id: &str) -> CivicResult<Vec<FixAttempt>> {
        Err(unreachable_store())
    }
}

/// A store whose searches never complete. Other calls fail immediately.
pub struct HangingStore;

impl IEvidenceStore for HangingStore {
    async fn insert_issue(&self, _issue: &Issue) -> CivicResult<()> {
        Err(unreachable_store())
    }
    async fn get_issue(&self, _issue_id: &str) -> CivicResult<Option<Issue>> {
        Err(unreachable_store())
    }
    async fn search_issues(&self, _query: &IssueQuery) -> CivicResult<Vec<Issue>> {
        std::future::pending().await
    }
    async fn list_issues_near(
        &self,
        _center: GeoPoint,
        _radius_m: f64,
        _page: PageRequest,
    ) -> CivicResult<NearbyPage> {
        std::future::pending().await
    }
    async fn apply_engagement(
        &self,
        _issue_id: &str,
        _action: EngagementAction,
        _thresholds: &EngagementConfig,
        _rescore: &RescoreFn,
    ) -> CivicResult<EngagementOutcome> {
        Err(unreachable_store())
    }
    async fn refresh_impact(&self, _issue_id: &str, _rescore: &RescoreFn) -> CivicResult<Issue> {
        Err(unreachable_store())
    }
    async fn close_with_fix(&self, _fix: &FixRecord, _closed_at: DateTime<Utc>) -> CivicResult<Issue> {
        Err(unreachable_store())
    }
    async fn get_fix(&self, _fix_id: &str) -> CivicResult<Option<FixRecord>> {
        Err(unreachable_store())
    }
    async fn search_fixes(&self, _query: &FixQuery) -> CivicResult<Vec<FixRecord>> {
        std::future::pending().await
    }
    async fn record_fix_attempt(&self, _attempt: &FixAttempt) -> CivicResult<()> {
        Err(unreachable_store())
    }
    async fn fix_attempts_for(&self, _issue_id: &str) -> CivicResult<Vec<FixAttempt>> {
        Err(unreachable_store())
    }
}
