//! EvidenceRetriever: plans, executes, and degrades retrieval.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use civicfix_core::config::RetrievalConfig;
use civicfix_core::constants::normalize_label;
use civicfix_core::models::{EvidenceSnippet, GeoPoint};
use civicfix_core::traits::IEvidenceStore;

use crate::snippets::{fix_snippet, issue_snippet};
use crate::strategy::RetrievalStrategy;

pub struct EvidenceRetriever<S> {
    store: Arc<S>,
    config: RetrievalConfig,
    expected_dims: usize,
}

impl<S: IEvidenceStore> EvidenceRetriever<S> {
    pub fn new(store: Arc<S>, config: RetrievalConfig, expected_dims: usize) -> Self {
        Self {
            store,
            config,
            expected_dims,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Up to `k` past issues near `location` created within
    /// `lookback_days`. Empty on any failure.
    pub async fn retrieve_similar_issues(
        &self,
        location: GeoPoint,
        category_hints: &[String],
        lookback_days: i64,
        k: usize,
        query_embedding: Option<&[f32]>,
    ) -> Vec<EvidenceSnippet> {
        if k == 0 {
            return Vec::new();
        }
        let hints = normalize_hints(category_hints);
        let strategy = RetrievalStrategy::select(query_embedding, self.expected_dims);
        let query = strategy.issue_query(location, &hints, lookback_days, k, &self.config, Utc::now());

        let issues = match tokio::time::timeout(self.timeout(), self.store.search_issues(&query)).await {
            Ok(Ok(issues)) => issues,
            Ok(Err(e)) => {
                warn!(strategy = strategy.name(), error = %e, "issue retrieval failed, continuing without evidence");
                return Vec::new();
            }
            Err(_) => {
                warn!(
                    strategy = strategy.name(),
                    timeout_secs = self.config.timeout_secs,
                    "issue retrieval timed out, continuing without evidence"
                );
                return Vec::new();
            }
        };

        let snippets = dedup_take(
            issues.iter().map(|i| issue_snippet(i, self.config.snippet_chars)),
            k,
        );
        debug!(
            strategy = strategy.name(),
            candidates = issues.len(),
            returned = snippets.len(),
            "issue evidence retrieved"
        );
        snippets
    }

    /// Same as [`Self::retrieve_similar_issues`] with the configured
    /// lookback and top-k.
    pub async fn issues_near(
        &self,
        location: GeoPoint,
        category_hints: &[String],
        query_embedding: Option<&[f32]>,
    ) -> Vec<EvidenceSnippet> {
        self.retrieve_similar_issues(
            location,
            category_hints,
            self.config.lookback_days,
            self.config.issue_top_k,
            query_embedding,
        )
        .await
    }

    /// Up to `k` past fixes for the hinted categories. Empty on any failure.
    pub async fn retrieve_similar_fixes(
        &self,
        category_hints: &[String],
        k: usize,
        query_embedding: Option<&[f32]>,
    ) -> Vec<EvidenceSnippet> {
        if k == 0 {
            return Vec::new();
        }
        let hints = normalize_hints(category_hints);
        let strategy = RetrievalStrategy::select(query_embedding, self.expected_dims);
        let query = strategy.fix_query(&hints, k, &self.config);

        let fixes = match tokio::time::timeout(self.timeout(), self.store.search_fixes(&query)).await {
            Ok(Ok(fixes)) => fixes,
            Ok(Err(e)) => {
                warn!(strategy = strategy.name(), error = %e, "fix retrieval failed, continuing without evidence");
                return Vec::new();
            }
            Err(_) => {
                warn!(
                    strategy = strategy.name(),
                    timeout_secs = self.config.timeout_secs,
                    "fix retrieval timed out, continuing without evidence"
                );
                return Vec::new();
            }
        };

        let snippets = dedup_take(
            fixes.iter().map(|f| fix_snippet(f, self.config.snippet_chars)),
            k,
        );
        debug!(
            strategy = strategy.name(),
            candidates = fixes.len(),
            returned = snippets.len(),
            "fix evidence retrieved"
        );
        snippets
    }
}

fn normalize_hints(hints: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    hints
        .iter()
        .map(|h| normalize_label(h))
        .filter(|h| !h.is_empty() && seen.insert(h.clone()))
        .collect()
}

/// First `k` snippets with distinct ids, in rank order.
fn dedup_take(snippets: impl Iterator<Item = EvidenceSnippet>, k: usize) -> Vec<EvidenceSnippet> {
    let mut seen = HashSet::new();
    snippets
        .filter(|s| seen.insert(s.id.clone()))
        .take(k)
        .collect()
}
