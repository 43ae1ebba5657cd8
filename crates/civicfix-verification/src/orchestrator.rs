//! FixVerificationOrchestrator: context, verifier, reconciliation, write.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use civicfix_core::errors::{CivicError, CivicResult};
use civicfix_core::models::{
    FixAttempt, FixOutcome, FixRecord, Issue, OutcomeHint, OverallOutcome, VerificationRequest,
    VerifierOutput,
};
use civicfix_core::traits::{IEmbeddingProvider, IEvidenceStore, IFixVerifier};
use civicfix_core::{BackoffPolicy, CivicConfig};
use civicfix_embeddings::EmbeddingEngine;
use civicfix_retrieval::EvidenceRetriever;
use civicfix_upstream::verifier::VERIFIER_SERVICE;
use civicfix_upstream::with_retry;

use crate::reconcile::{label_outcomes, reconcile, unresolved_labels, IssueStatusUpdate};
use crate::submission::{FixSubmission, VerificationReport};

#[derive(Debug, Clone)]
pub struct VerificationSettings {
    pub retry: BackoffPolicy,
    pub verifier_timeout: Duration,
    /// Similar past fixes shown to the verifier.
    pub fix_top_k: usize,
}

impl VerificationSettings {
    pub fn from_config(config: &CivicConfig) -> Self {
        Self {
            retry: BackoffPolicy::from(&config.upstream.retry),
            verifier_timeout: Duration::from_secs(config.upstream.verifier_timeout_secs),
            fix_top_k: config.retrieval.fix_top_k,
        }
    }
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self::from_config(&CivicConfig::default())
    }
}

pub struct FixVerificationOrchestrator<S, P, V> {
    store: Arc<S>,
    embeddings: Arc<EmbeddingEngine<P>>,
    retriever: Arc<EvidenceRetriever<S>>,
    verifier: Arc<V>,
    settings: VerificationSettings,
}

impl<S, P, V> FixVerificationOrchestrator<S, P, V>
where
    S: IEvidenceStore,
    P: IEmbeddingProvider,
    V: IFixVerifier,
{
    pub fn new(
        store: Arc<S>,
        embeddings: Arc<EmbeddingEngine<P>>,
        retriever: Arc<EvidenceRetriever<S>>,
        verifier: Arc<V>,
        settings: VerificationSettings,
    ) -> Self {
        Self {
            store,
            embeddings,
            retriever,
            verifier,
            settings,
        }
    }

    /// Verify a claimed fix and apply the reconciled outcome.
    ///
    /// The issue must exist and be open. Similar fixes are retrieved first
    /// and an empty context never blocks verification. The verifier's
    /// overall hint is advisory; the outcome comes from [`reconcile`].
    pub async fn verify_and_apply(&self, submission: FixSubmission) -> CivicResult<VerificationReport> {
        submission.validate()?;
        let issue = self
            .store
            .get_issue(&submission.issue_id)
            .await?
            .ok_or_else(|| CivicError::IssueNotFound {
                id: submission.issue_id.clone(),
            })?;
        if !issue.is_open() {
            return Err(CivicError::InvalidTransition {
                issue_id: issue.issue_id.clone(),
                status: issue.status.to_string(),
                action: "verify a fix for".to_string(),
            });
        }

        let query = self
            .embeddings
            .embed_fix_query(&submission.fix_description, &issue.issue_types)
            .await;
        let context = self
            .retriever
            .retrieve_similar_fixes(&issue.issue_types, self.settings.fix_top_k, query.as_deref())
            .await;

        let request = VerificationRequest {
            issue_id: issue.issue_id.clone(),
            before_image_url: issue.photo_url.clone(),
            after_image_urls: submission.image_urls.clone(),
            issue_description: issue_summary(&issue),
            fix_description: submission.fix_description.clone(),
            detected_types: issue.issue_types.clone(),
            context,
        };
        let output = with_retry(
            VERIFIER_SERVICE,
            &self.settings.retry,
            self.settings.verifier_timeout,
            || self.verifier.verify(&request),
        )
        .await?;

        let (outcome, update) = reconcile(&issue, &output.per_issue_results);
        let unresolved = unresolved_labels(&issue, &output.per_issue_results);
        if let Some(hint) = output.overall_outcome_hint {
            if !hint_agrees(hint, outcome) {
                warn!(
                    issue_id = %issue.issue_id,
                    hint = ?hint,
                    outcome = ?outcome,
                    unresolved = ?unresolved,
                    "verifier hint disagrees with reconciled outcome"
                );
            }
        }

        let submitted_at = submission.submitted_at.unwrap_or_else(Utc::now);
        let fix_outcomes = label_outcomes(&issue, &output.per_issue_results);
        let source_doc_ids = source_ids(&issue, &request);

        let (issue, fix) = match update {
            IssueStatusUpdate::Close => {
                let mut fix = build_fix_record(
                    &issue,
                    &submission,
                    &output,
                    fix_outcomes.clone(),
                    source_doc_ids,
                    submitted_at,
                );
                fix.text_embedding = self.embeddings.embed_fix(&fix).await;
                let closed = self.store.close_with_fix(&fix, submitted_at).await?;
                (closed, Some(fix))
            }
            IssueStatusUpdate::KeepOpen => (issue, None),
        };

        let attempt = FixAttempt {
            attempt_id: Uuid::new_v4().to_string(),
            issue_id: issue.issue_id.clone(),
            submitted_by: submission.submitted_by,
            submitted_at,
            fix_description: submission.fix_description,
            image_urls: submission.image_urls,
            outcome,
            verifier_hint: output.overall_outcome_hint,
            fix_outcomes,
            fix_id: fix.as_ref().map(|f| f.fix_id.clone()),
        };
        match (self.store.record_fix_attempt(&attempt).await, &fix) {
            (Ok(()), _) => {}
            // Closure already committed.
            (Err(e), Some(_)) => {
                warn!(issue_id = %issue.issue_id, error = %e, "failed to record fix attempt");
            }
            (Err(e), None) => return Err(e),
        }

        info!(
            issue_id = %issue.issue_id,
            outcome = ?outcome,
            fix_id = ?attempt.fix_id,
            unresolved = unresolved.len(),
            "fix verification applied"
        );
        Ok(VerificationReport {
            outcome,
            verifier_hint: output.overall_outcome_hint,
            unresolved_labels: unresolved,
            issue,
            fix,
            attempt,
        })
    }
}

fn hint_agrees(hint: OutcomeHint, outcome: OverallOutcome) -> bool {
    matches!(
        (hint, outcome),
        (OutcomeHint::Closed, OverallOutcome::Closed)
            | (OutcomeHint::Rejected | OutcomeHint::Partial, OverallOutcome::Rejected)
    )
}

/// Issue text shown to the verifier.
fn issue_summary(issue: &Issue) -> String {
    if issue.description.trim().is_empty() {
        issue.auto_caption.clone()
    } else {
        issue.description.clone()
    }
}

/// The issue itself, then the past fixes the verifier was shown.
fn source_ids(issue: &Issue, request: &VerificationRequest) -> Vec<String> {
    std::iter::once(issue.issue_id.clone())
        .chain(request.context.iter().map(|s| s.id.clone()))
        .collect()
}

fn build_fix_record(
    issue: &Issue,
    submission: &FixSubmission,
    output: &VerifierOutput,
    fix_outcomes: Vec<FixOutcome>,
    source_doc_ids: Vec<String>,
    created_at: DateTime<Utc>,
) -> FixRecord {
    let title = match output.fix_summary.trim() {
        "" => format!("Fix for {}", issue.issue_types.join(", ")),
        summary => summary.to_string(),
    };
    let summary = match submission.fix_description.trim() {
        "" => output.fix_summary.trim().to_string(),
        description => description.to_string(),
    };
    let success_rate = if output.suggested_success_rate.is_finite() {
        output.suggested_success_rate.clamp(0.0, 1.0)
    } else {
        0.0
    };
    FixRecord {
        fix_id: Uuid::new_v4().to_string(),
        issue_id: issue.issue_id.clone(),
        created_by: submission.submitted_by.clone(),
        created_at,
        title,
        summary,
        image_urls: submission.image_urls.clone(),
        photo_count: submission.image_urls.len(),
        co2_saved: issue.fate_risk_co2,
        success_rate,
        related_issue_types: issue.issue_types.clone(),
        fix_outcomes,
        text_embedding: None,
        source_doc_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_hint_agrees_with_rejection() {
        assert!(hint_agrees(OutcomeHint::Closed, OverallOutcome::Closed));
        assert!(hint_agrees(OutcomeHint::Partial, OverallOutcome::Rejected));
        assert!(!hint_agrees(OutcomeHint::Closed, OverallOutcome::Rejected));
        assert!(!hint_agrees(OutcomeHint::Rejected, OverallOutcome::Closed));
    }
}
