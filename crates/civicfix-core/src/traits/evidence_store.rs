use chrono::{DateTime, Utc};

use crate::config::EngagementConfig;
use crate::errors::CivicResult;
use crate::models::{
    EngagementAction, EngagementOutcome, FixAttempt, FixQuery, FixRecord, GeoPoint,
    ImpactAssessment, Issue, IssueQuery, NearbyPage, PageRequest,
};

/// Recomputes an issue's impact from its current fields. Called inside the
/// store's read-modify-write so counters and score never diverge.
pub type RescoreFn = dyn Fn(&Issue) -> ImpactAssessment + Send + Sync;

/// Document store for issues and fixes.
///
/// Every mutating method is atomic per document: concurrent engagement on
/// the same issue never loses an increment.
#[allow(async_fn_in_trait)]
pub trait IEvidenceStore: Send + Sync {
    // --- Issues ---

    /// Insert a new issue, embedding included. All-or-nothing.
    async fn insert_issue(&self, issue: &Issue) -> CivicResult<()>;

    async fn get_issue(&self, issue_id: &str) -> CivicResult<Option<Issue>>;

    /// Filtered (and optionally vector-ranked) issue search. Spam is never
    /// returned.
    async fn search_issues(&self, query: &IssueQuery) -> CivicResult<Vec<Issue>>;

    /// Non-spam issues within `radius_m` of `center`, nearest first.
    async fn list_issues_near(
        &self,
        center: GeoPoint,
        radius_m: f64,
        page: PageRequest,
    ) -> CivicResult<NearbyPage>;

    /// Apply a community action and rescore, atomically.
    async fn apply_engagement(
        &self,
        issue_id: &str,
        action: EngagementAction,
        thresholds: &EngagementConfig,
        rescore: &RescoreFn,
    ) -> CivicResult<EngagementOutcome>;

    /// Rescore an issue in place, atomically.
    async fn refresh_impact(&self, issue_id: &str, rescore: &RescoreFn) -> CivicResult<Issue>;

    // --- Fixes ---

    /// Insert the fix, close the issue, and link the fix id into the
    /// issue's evidence, atomically. Fails if the issue is not open.
    async fn close_with_fix(&self, fix: &FixRecord, closed_at: DateTime<Utc>) -> CivicResult<Issue>;

    async fn get_fix(&self, fix_id: &str) -> CivicResult<Option<FixRecord>>;

    async fn search_fixes(&self, query: &FixQuery) -> CivicResult<Vec<FixRecord>>;

    async fn record_fix_attempt(&self, attempt: &FixAttempt) -> CivicResult<()>;

    async fn fix_attempts_for(&self, issue_id: &str) -> CivicResult<Vec<FixAttempt>>;
}
