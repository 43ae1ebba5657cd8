//! StorageEngine: owns the connection pool, runs migrations on open, and
//! implements IEvidenceStore.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use civicfix_core::config::{EngagementConfig, StorageConfig};
use civicfix_core::errors::CivicResult;
use civicfix_core::models::{
    EngagementAction, EngagementOutcome, FixAttempt, FixQuery, FixRecord, GeoPoint, Issue,
    IssueQuery, NearbyPage, PageRequest,
};
use civicfix_core::traits::{IEvidenceStore, RescoreFn};

use crate::audit::{AuditEntry, AuditLogger};
use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{engagement, fix_crud, issue_crud, listing, search};

pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open (or create) a file-backed store.
    pub fn open(path: &Path, config: &StorageConfig) -> CivicResult<Self> {
        let pool = ConnectionPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        let mut engine = Self { pool };
        engine.initialize()?;
        info!(path = %path.display(), readers = config.read_pool_size, "storage opened");
        Ok(engine)
    }

    /// Open an in-memory store. All reads go through the writer.
    pub fn open_in_memory() -> CivicResult<Self> {
        let pool = ConnectionPool::open_in_memory(StorageConfig::default().busy_timeout_ms)?;
        let mut engine = Self { pool };
        engine.initialize()?;
        Ok(engine)
    }

    /// File-backed when `db_path` is set, in-memory otherwise.
    pub fn from_config(config: &StorageConfig) -> CivicResult<Self> {
        match config.db_path.as_deref() {
            Some(path) => Self::open(Path::new(path), config),
            None => Self::open_in_memory(),
        }
    }

    fn initialize(&mut self) -> CivicResult<()> {
        self.pool.writer.with_conn_mut(|conn| {
            let version = migrations::run_migrations(conn)?;
            debug!(schema_version = version, "storage schema ready");
            Ok(())
        })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn schema_version(&self) -> CivicResult<u32> {
        self.pool.writer.with_conn_sync(migrations::current_version)
    }

    /// Audit trail for an issue or fix, oldest first.
    pub async fn audit_entries_for(&self, entity_id: &str) -> CivicResult<Vec<AuditEntry>> {
        self.read(|conn| AuditLogger::entries_for(conn, entity_id))
            .await
    }

    fn with_reader<F, T>(&self, f: F) -> CivicResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> CivicResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn_sync(f),
        }
    }

    /// Async counterpart of `with_reader`: in-memory stores wait on the
    /// writer lock instead of blocking the task.
    async fn read<F, T>(&self, f: F) -> CivicResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> CivicResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn(f).await,
        }
    }

    // Blocking variants for callers outside an async runtime.

    pub fn insert_issue_sync(&self, issue: &Issue) -> CivicResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| issue_crud::insert_issue(conn, issue))
    }

    pub fn get_issue_sync(&self, issue_id: &str) -> CivicResult<Option<Issue>> {
        self.with_reader(|conn| issue_crud::get_issue(conn, issue_id))
    }

    pub fn apply_engagement_sync(
        &self,
        issue_id: &str,
        action: EngagementAction,
        thresholds: &EngagementConfig,
        rescore: &RescoreFn,
    ) -> CivicResult<EngagementOutcome> {
        self.pool.writer.with_conn_sync(|conn| {
            engagement::apply_engagement(conn, issue_id, action, thresholds, rescore, Utc::now())
        })
    }
}

/// SQLite calls are short and local; they run on the calling task once
/// the connection is acquired.
impl IEvidenceStore for StorageEngine {
    async fn insert_issue(&self, issue: &Issue) -> CivicResult<()> {
        self.pool
            .writer
            .with_conn(|conn| issue_crud::insert_issue(conn, issue))
            .await
    }

    async fn get_issue(&self, issue_id: &str) -> CivicResult<Option<Issue>> {
        self.read(|conn| issue_crud::get_issue(conn, issue_id)).await
    }

    async fn search_issues(&self, query: &IssueQuery) -> CivicResult<Vec<Issue>> {
        self.read(|conn| search::search_issues(conn, query)).await
    }

    async fn list_issues_near(
        &self,
        center: GeoPoint,
        radius_m: f64,
        page: PageRequest,
    ) -> CivicResult<NearbyPage> {
        self.read(|conn| listing::list_issues_near(conn, center, radius_m, page))
            .await
    }

    async fn apply_engagement(
        &self,
        issue_id: &str,
        action: EngagementAction,
        thresholds: &EngagementConfig,
        rescore: &RescoreFn,
    ) -> CivicResult<EngagementOutcome> {
        self.pool
            .writer
            .with_conn(|conn| {
                engagement::apply_engagement(conn, issue_id, action, thresholds, rescore, Utc::now())
            })
            .await
    }

    async fn refresh_impact(&self, issue_id: &str, rescore: &RescoreFn) -> CivicResult<Issue> {
        self.pool
            .writer
            .with_conn(|conn| engagement::refresh_impact(conn, issue_id, rescore, Utc::now()))
            .await
    }

    async fn close_with_fix(
        &self,
        fix: &FixRecord,
        closed_at: DateTime<Utc>,
    ) -> CivicResult<Issue> {
        self.pool
            .writer
            .with_conn(|conn| fix_crud::close_with_fix(conn, fix, closed_at))
            .await
    }

    async fn get_fix(&self, fix_id: &str) -> CivicResult<Option<FixRecord>> {
        self.read(|conn| fix_crud::get_fix(conn, fix_id)).await
    }

    async fn search_fixes(&self, query: &FixQuery) -> CivicResult<Vec<FixRecord>> {
        self.read(|conn| search::search_fixes(conn, query)).await
    }

    async fn record_fix_attempt(&self, attempt: &FixAttempt) -> CivicResult<()> {
        self.pool
            .writer
            .with_conn(|conn| fix_crud::record_fix_attempt(conn, attempt))
            .await
    }

    async fn fix_attempts_for(&self, issue_id: &str) -> CivicResult<Vec<FixAttempt>> {
        self.read(|conn| fix_crud::fix_attempts_for(conn, issue_id))
            .await
    }
}
