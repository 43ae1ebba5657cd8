//! CivicFix facade: one call per endpoint over the wired engines.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use civicfix_core::errors::{CivicError, CivicResult, ValidationError};
use civicfix_core::models::{
    EngagementAction, EngagementOutcome, GeoPoint, Issue, NearbyPage, PageRequest,
};
use civicfix_core::traits::{
    IEmbeddingProvider, IEvidenceStore, IFixVerifier, IIssueClassifier, IWeatherProvider,
};
use civicfix_core::{BackoffPolicy, CivicConfig};
use civicfix_embeddings::{create_provider, ConfiguredProvider, EmbeddingEngine};
use civicfix_impact::{ImpactContext, ImpactEngine};
use civicfix_indexer::{IndexOutcome, IndexerSettings, IssueIndexer, SubmissionRequest};
use civicfix_retrieval::EvidenceRetriever;
use civicfix_storage::StorageEngine;
use civicfix_upstream::{HttpClassifier, HttpVerifier, OpenMeteoClient};
use civicfix_verification::{
    FixSubmission, FixVerificationOrchestrator, VerificationReport, VerificationSettings,
};

/// The production wiring: SQLite store, configured embedding provider, and
/// HTTP clients for the classifier, verifier, and weather archive.
pub type DefaultCivicFix =
    CivicFix<StorageEngine, ConfiguredProvider, HttpClassifier, HttpVerifier, OpenMeteoClient>;

/// Owns every engine. Generic over the boundary traits so tests can swap
/// in fakes through [`CivicFix::with_components`].
pub struct CivicFix<S, P, C, V, W> {
    config: CivicConfig,
    store: Arc<S>,
    impact: ImpactEngine,
    indexer: IssueIndexer<S, P, C, W>,
    verification: FixVerificationOrchestrator<S, P, V>,
}

impl DefaultCivicFix {
    /// Validate the config and build the production wiring.
    pub fn from_config(config: CivicConfig) -> CivicResult<Self> {
        config.validate()?;
        let store = Arc::new(StorageEngine::from_config(&config.storage)?);
        let provider = create_provider(&config.embedding);
        let classifier = HttpClassifier::from_config(&config.upstream)?;
        let verifier = HttpVerifier::from_config(&config.upstream)?;
        let weather = OpenMeteoClient::from_config(&config.upstream)?;
        info!(
            persistent = config.storage.db_path.is_some(),
            provider = provider.name(),
            weather_enabled = config.upstream.weather_enabled,
            "CivicFix runtime initialized"
        );
        Ok(Self::with_components(
            config, store, provider, classifier, verifier, weather,
        ))
    }
}

impl<S, P, C, V, W> CivicFix<S, P, C, V, W>
where
    S: IEvidenceStore,
    P: IEmbeddingProvider,
    C: IIssueClassifier,
    V: IFixVerifier,
    W: IWeatherProvider,
{
    /// Wire the engines around caller-supplied boundary implementations.
    /// The config is taken as-is; call [`CivicConfig::validate`] first if
    /// it came from outside.
    pub fn with_components(
        config: CivicConfig,
        store: Arc<S>,
        provider: P,
        classifier: C,
        verifier: V,
        weather: W,
    ) -> Self {
        let impact = ImpactEngine::with_weights(config.scoring.clone());
        let embeddings = Arc::new(EmbeddingEngine::new(
            provider,
            &config.embedding,
            BackoffPolicy::from(&config.upstream.retry),
        ));
        let retriever = Arc::new(EvidenceRetriever::new(
            store.clone(),
            config.retrieval.clone(),
            embeddings.dimensions(),
        ));
        let indexer = IssueIndexer::new(
            store.clone(),
            embeddings.clone(),
            retriever.clone(),
            Arc::new(classifier),
            Arc::new(weather),
            impact.clone(),
            IndexerSettings::from_config(&config),
        );
        let verification = FixVerificationOrchestrator::new(
            store.clone(),
            embeddings,
            retriever,
            Arc::new(verifier),
            VerificationSettings::from_config(&config),
        );
        Self {
            config,
            store,
            impact,
            indexer,
            verification,
        }
    }

    pub fn config(&self) -> &CivicConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // --- Issues ---

    /// Classify a citizen report and index it when anything was found.
    pub async fn submit_issue(&self, request: SubmissionRequest) -> CivicResult<IndexOutcome> {
        self.indexer.submit(request).await
    }

    pub async fn get_issue(&self, issue_id: &str) -> CivicResult<Issue> {
        self.store
            .get_issue(issue_id)
            .await?
            .ok_or_else(|| CivicError::IssueNotFound {
                id: issue_id.to_string(),
            })
    }

    /// Non-spam issues around a point, nearest first.
    ///
    /// `radius_km` and `page_size` fall back to the listing defaults; page
    /// sizes above `listing.max_page_size` are clamped.
    pub async fn list_issues_near(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
        page: usize,
        page_size: Option<usize>,
    ) -> CivicResult<NearbyPage> {
        let center = GeoPoint::new(lat, lon)?;
        let listing = &self.config.listing;
        let radius_km = radius_km.unwrap_or(listing.default_radius_km);
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(ValidationError::InvalidRadius { radius_km }.into());
        }
        let page_size = page_size
            .unwrap_or(listing.default_page_size)
            .min(listing.max_page_size);
        self.store
            .list_issues_near(center, radius_km * 1000.0, PageRequest { page, page_size })
            .await
    }

    /// Rescore an issue with a fresh density estimate.
    pub async fn recompute_impact(&self, issue_id: &str, density_norm: f64) -> CivicResult<Issue> {
        self.indexer.recompute_impact(issue_id, density_norm).await
    }

    // --- Engagement ---

    pub async fn upvote(&self, issue_id: &str) -> CivicResult<EngagementOutcome> {
        self.engage(issue_id, EngagementAction::Upvote).await
    }

    pub async fn remove_upvote(&self, issue_id: &str) -> CivicResult<EngagementOutcome> {
        self.engage(issue_id, EngagementAction::RemoveUpvote).await
    }

    pub async fn report(&self, issue_id: &str) -> CivicResult<EngagementOutcome> {
        self.engage(issue_id, EngagementAction::Report).await
    }

    async fn engage(
        &self,
        issue_id: &str,
        action: EngagementAction,
    ) -> CivicResult<EngagementOutcome> {
        let impact = self.impact.clone();
        let ctx = ImpactContext::at(Utc::now());
        let rescore = move |issue: &Issue| impact.assess_issue(issue, 0.0, &ctx);
        let outcome = self
            .store
            .apply_engagement(issue_id, action, &self.config.engagement, &rescore)
            .await?;
        if let Some(transition) = outcome.transition {
            info!(
                issue_id,
                action = ?action,
                from = %transition.from,
                to = %transition.to,
                "engagement changed issue status"
            );
        }
        Ok(outcome)
    }

    // --- Fixes ---

    /// Verify a claimed fix and close the issue when every label is fixed.
    pub async fn submit_fix(&self, submission: FixSubmission) -> CivicResult<VerificationReport> {
        self.verification.verify_and_apply(submission).await
    }
}
