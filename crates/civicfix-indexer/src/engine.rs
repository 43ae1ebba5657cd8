//! IssueIndexer: submission pipeline and all-or-nothing indexing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use civicfix_core::errors::{CivicError, CivicResult, UpstreamError, ValidationError};
use civicfix_core::models::{
    ClassificationRequest, ClassifierOutput, EvidenceSnippet, GeoPoint, Issue, WeatherSummary,
};
use civicfix_core::traits::{IEmbeddingProvider, IEvidenceStore, IIssueClassifier, IWeatherProvider};
use civicfix_embeddings::EmbeddingEngine;
use civicfix_impact::{ImpactContext, ImpactEngine};
use civicfix_retrieval::EvidenceRetriever;
use civicfix_upstream::classifier::CLASSIFIER_SERVICE;
use civicfix_upstream::with_retry;

use crate::document::{assemble_issue, IssueMetadata};
use crate::normalize::normalize_labels;
use crate::settings::IndexerSettings;
use crate::submission::{IndexOutcome, SubmissionRequest};

pub struct IssueIndexer<S, P, C, W> {
    store: Arc<S>,
    embeddings: Arc<EmbeddingEngine<P>>,
    retriever: Arc<EvidenceRetriever<S>>,
    classifier: Arc<C>,
    weather: Arc<W>,
    impact: ImpactEngine,
    settings: IndexerSettings,
}

impl<S, P, C, W> IssueIndexer<S, P, C, W>
where
    S: IEvidenceStore,
    P: IEmbeddingProvider,
    C: IIssueClassifier,
    W: IWeatherProvider,
{
    pub fn new(
        store: Arc<S>,
        embeddings: Arc<EmbeddingEngine<P>>,
        retriever: Arc<EvidenceRetriever<S>>,
        classifier: Arc<C>,
        weather: Arc<W>,
        impact: ImpactEngine,
        settings: IndexerSettings,
    ) -> Self {
        Self {
            store,
            embeddings,
            retriever,
            classifier,
            weather,
            impact,
            settings,
        }
    }

    pub fn settings(&self) -> &IndexerSettings {
        &self.settings
    }

    /// Full submission: context fan-out, classification, indexing.
    ///
    /// Embedding, retrieval and weather degrade to nothing on failure. The
    /// classifier does not: once its retries are spent the submission fails.
    pub async fn submit(&self, request: SubmissionRequest) -> CivicResult<IndexOutcome> {
        request.validate()?;
        let timestamp = request.timestamp.unwrap_or_else(Utc::now);
        let location = request.location;

        let evidence = async {
            let query = self
                .embeddings
                .embed_query(&request.description, &request.user_selected_labels)
                .await;
            self.retriever
                .issues_near(location, &request.user_selected_labels, query.as_deref())
                .await
        };
        let (evidence, weather) =
            tokio::join!(evidence, self.fetch_weather(location, timestamp));
        info!(
            evidence = evidence.len(),
            has_weather = weather.is_some(),
            "submission context assembled"
        );

        let classification = ClassificationRequest {
            image_url: request.image_url.clone(),
            description: request.description.clone(),
            location,
            timestamp,
            user_selected_labels: request.user_selected_labels.clone(),
            evidence,
            weather,
        };
        let output = self.classify(&classification).await?;

        let metadata = IssueMetadata {
            reported_by: request.reported_by,
            photo_url: Some(request.image_url),
            description: request.description,
            user_selected_labels: request.user_selected_labels,
            weather: classification.weather.clone(),
        };
        match self
            .build_and_index(&output, location, timestamp, &classification.evidence, metadata)
            .await
        {
            // Out-of-range values here came from the classifier, not the user.
            Err(CivicError::ValidationError(e @ ValidationError::ConfidenceOutOfRange { .. })) => {
                warn!(error = %e, "classifier returned an out-of-range confidence");
                Err(UpstreamError::InvalidResponse {
                    service: CLASSIFIER_SERVICE.to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
            other => other,
        }
    }

    /// Validate classifier output and persist it as a new open issue.
    ///
    /// Zero surviving labels yields [`IndexOutcome::NoIssuesFound`] and no
    /// write. The document, embedding included, is written in one step.
    pub async fn build_and_index(
        &self,
        output: &ClassifierOutput,
        location: GeoPoint,
        timestamp: DateTime<Utc>,
        evidence: &[EvidenceSnippet],
        metadata: IssueMetadata,
    ) -> CivicResult<IndexOutcome> {
        location.validate()?;
        if output.no_issues_found {
            info!("classifier found no issues");
            return Ok(IndexOutcome::NoIssuesFound);
        }
        let labels = normalize_labels(&output.detected_issues, &self.settings.indexing)?;
        if labels.is_empty() {
            info!(
                candidates = output.detected_issues.len(),
                "no labels survived filtering, nothing indexed"
            );
            return Ok(IndexOutcome::NoIssuesFound);
        }

        let issue_id = Uuid::new_v4().to_string();
        let mut issue = assemble_issue(
            issue_id.clone(),
            labels,
            output,
            location,
            timestamp,
            evidence,
            metadata,
            &self.impact,
        );
        issue.text_embedding = self.embeddings.embed_issue(&issue).await;

        self.store.insert_issue(&issue).await?;
        info!(
            issue_id = %issue_id,
            labels = issue.detected_issues.len(),
            impact_score = issue.impact_score,
            visibility_radius_m = issue.visibility_radius_m,
            embedded = issue.text_embedding.is_some(),
            "issue indexed"
        );
        Ok(IndexOutcome::Indexed { issue_id })
    }

    /// Rescore an existing issue now, with a fresh density estimate.
    pub async fn recompute_impact(&self, issue_id: &str, density_norm: f64) -> CivicResult<Issue> {
        let impact = self.impact.clone();
        let ctx = ImpactContext::at(Utc::now());
        let rescore = move |issue: &Issue| impact.assess_issue(issue, density_norm, &ctx);
        self.store.refresh_impact(issue_id, &rescore).await
    }

    async fn classify(&self, request: &ClassificationRequest) -> CivicResult<ClassifierOutput> {
        let result = with_retry(
            CLASSIFIER_SERVICE,
            &self.settings.retry,
            self.settings.classifier_timeout,
            || self.classifier.classify(request),
        )
        .await;
        result.map_err(|e| {
            if let UpstreamError::InvalidResponse { reason, .. } = &e {
                warn!(reason = %reason, "classifier response rejected");
            }
            CivicError::from(e)
        })
    }

    async fn fetch_weather(&self, location: GeoPoint, at: DateTime<Utc>) -> Option<WeatherSummary> {
        if !self.settings.weather_enabled {
            return None;
        }
        match tokio::time::timeout(self.settings.weather_timeout, self.weather.summary(location, at))
            .await
        {
            Ok(Ok(summary)) => summary,
            Ok(Err(e)) => {
                warn!(error = %e, "weather lookup failed, continuing without it");
                None
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.settings.weather_timeout.as_secs(),
                    "weather lookup timed out, continuing without it"
                );
                None
            }
        }
    }
}
