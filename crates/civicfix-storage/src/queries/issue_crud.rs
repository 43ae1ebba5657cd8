//! Insert, get, and state updates for issue documents.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::json;

use civicfix_core::errors::{CivicResult, StorageError};
use civicfix_core::models::{GeoPoint, Issue, IssueStatus};

use super::{bytes_to_f32_vec, f32_vec_to_bytes, from_json, joined_embedding, parse_ts, to_json, ts};
use crate::audit::{AuditLogger, AuditOperation};
use crate::to_storage_err;

pub(crate) const ISSUE_COLUMNS: &str = "issue_id, reported_by, lat, lon, created_at, updated_at, \
     status, closed_by, closed_at, photo_url, description, auto_caption, user_selected_labels, \
     detected_issues, issue_types, severity_score, fate_risk_co2, upvotes, reports, impact_score, \
     visibility_radius_m, weather, evidence_ids";
const ISSUE_COLUMN_COUNT: usize = 23;

/// Raw column values, decoded into an [`Issue`] outside the row callback
/// so JSON failures surface as storage errors.
pub(crate) struct IssueRow {
    issue_id: String,
    reported_by: Option<String>,
    lat: f64,
    lon: f64,
    created_at: String,
    updated_at: String,
    status: String,
    closed_by: Option<String>,
    closed_at: Option<String>,
    photo_url: Option<String>,
    description: String,
    auto_caption: String,
    user_selected_labels: String,
    detected_issues: String,
    issue_types: String,
    severity_score: f64,
    fate_risk_co2: f64,
    upvotes: String,
    reports: String,
    impact_score: f64,
    visibility_radius_m: u32,
    weather: Option<String>,
    evidence_ids: String,
}

impl IssueRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            issue_id: row.get(0)?,
            reported_by: row.get(1)?,
            lat: row.get(2)?,
            lon: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
            status: row.get(6)?,
            closed_by: row.get(7)?,
            closed_at: row.get(8)?,
            photo_url: row.get(9)?,
            description: row.get(10)?,
            auto_caption: row.get(11)?,
            user_selected_labels: row.get(12)?,
            detected_issues: row.get(13)?,
            issue_types: row.get(14)?,
            severity_score: row.get(15)?,
            fate_risk_co2: row.get(16)?,
            upvotes: row.get(17)?,
            reports: row.get(18)?,
            impact_score: row.get(19)?,
            visibility_radius_m: row.get(20)?,
            weather: row.get(21)?,
            evidence_ids: row.get(22)?,
        })
    }

    pub(crate) fn into_issue(self) -> CivicResult<Issue> {
        let id = self.issue_id.as_str();
        let status: IssueStatus = self.status.parse().map_err(to_storage_err)?;
        Ok(Issue {
            location: GeoPoint {
                lat: self.lat,
                lon: self.lon,
            },
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
            status,
            closed_at: self.closed_at.as_deref().map(parse_ts).transpose()?,
            user_selected_labels: from_json(id, &self.user_selected_labels)?,
            detected_issues: from_json(id, &self.detected_issues)?,
            issue_types: from_json(id, &self.issue_types)?,
            upvotes: from_json(id, &self.upvotes)?,
            reports: from_json(id, &self.reports)?,
            weather: self.weather.as_deref().map(|w| from_json(id, w)).transpose()?,
            evidence_ids: from_json(id, &self.evidence_ids)?,
            reported_by: self.reported_by,
            closed_by: self.closed_by,
            photo_url: self.photo_url,
            description: self.description,
            auto_caption: self.auto_caption,
            severity_score: self.severity_score,
            fate_risk_co2: self.fate_risk_co2,
            impact_score: self.impact_score,
            visibility_radius_m: self.visibility_radius_m,
            text_embedding: None,
            issue_id: self.issue_id,
        })
    }
}

/// Insert an issue and its embedding in one transaction. A duplicate id is
/// a conflict and leaves the store untouched.
pub fn insert_issue(conn: &Connection, issue: &Issue) -> CivicResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_issue begin: {e}")))?;

    match insert_issue_inner(&tx, issue) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("insert_issue commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn insert_issue_inner(conn: &Connection, issue: &Issue) -> CivicResult<()> {
    let id = issue.issue_id.as_str();
    if exists(conn, id)? {
        return Err(StorageError::Conflict { id: id.to_string() }.into());
    }

    conn.execute(
        &format!(
            "INSERT INTO issues ({ISSUE_COLUMNS}) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23
            )"
        ),
        params![
            id,
            issue.reported_by,
            issue.location.lat,
            issue.location.lon,
            ts(&issue.created_at),
            ts(&issue.updated_at),
            issue.status.as_str(),
            issue.closed_by,
            issue.closed_at.as_ref().map(ts),
            issue.photo_url,
            issue.description,
            issue.auto_caption,
            to_json(id, &issue.user_selected_labels)?,
            to_json(id, &issue.detected_issues)?,
            to_json(id, &issue.issue_types)?,
            issue.severity_score,
            issue.fate_risk_co2,
            to_json(id, &issue.upvotes)?,
            to_json(id, &issue.reports)?,
            issue.impact_score,
            issue.visibility_radius_m,
            issue.weather.as_ref().map(|w| to_json(id, w)).transpose()?,
            to_json(id, &issue.evidence_ids)?,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    if let Some(embedding) = &issue.text_embedding {
        conn.execute(
            "INSERT INTO issue_embeddings (issue_id, embedding, dimensions) VALUES (?1, ?2, ?3)",
            params![id, f32_vec_to_bytes(embedding), embedding.len() as i64],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }

    AuditLogger::log(
        conn,
        id,
        AuditOperation::IssueCreated,
        issue.reported_by.as_deref().unwrap_or("system"),
        json!({
            "issue_types": issue.issue_types,
            "impact_score": issue.impact_score,
            "embedded": issue.text_embedding.is_some(),
        }),
    )?;
    Ok(())
}

fn exists(conn: &Connection, issue_id: &str) -> CivicResult<bool> {
    conn.query_row(
        "SELECT 1 FROM issues WHERE issue_id = ?1",
        params![issue_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Get an issue, its stored embedding included.
pub fn get_issue(conn: &Connection, issue_id: &str) -> CivicResult<Option<Issue>> {
    let row = conn
        .query_row(
            &format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE issue_id = ?1"),
            params![issue_id],
            IssueRow::from_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some(row) = row else {
        return Ok(None);
    };
    let mut issue = row.into_issue()?;
    issue.text_embedding = get_issue_embedding(conn, issue_id)?;
    Ok(Some(issue))
}

pub fn get_issue_embedding(conn: &Connection, issue_id: &str) -> CivicResult<Option<Vec<f32>>> {
    let row: Option<(Vec<u8>, i64)> = conn
        .query_row(
            "SELECT embedding, dimensions FROM issue_embeddings WHERE issue_id = ?1",
            params![issue_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.map(|(blob, dims)| bytes_to_f32_vec(issue_id, &blob, dims as usize))
        .transpose()
}

/// Run `SELECT {ISSUE_COLUMNS} FROM issues {tail}` and decode every row.
/// Embeddings are not loaded.
pub(crate) fn select_issues(
    conn: &Connection,
    tail: &str,
    values: Vec<Value>,
) -> CivicResult<Vec<Issue>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {ISSUE_COLUMNS} FROM issues {tail}"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(values), IssueRow::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut issues = Vec::new();
    for row in rows {
        let row = row.map_err(|e| to_storage_err(e.to_string()))?;
        issues.push(row.into_issue()?);
    }
    Ok(issues)
}

/// Like [`select_issues`], with each issue's stored embedding joined in.
/// `tail` must qualify any `issue_id` reference it makes.
pub(crate) fn select_issues_with_embeddings(
    conn: &Connection,
    tail: &str,
    values: Vec<Value>,
) -> CivicResult<Vec<Issue>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ISSUE_COLUMNS}, embedding, dimensions \
             FROM issues LEFT JOIN issue_embeddings USING (issue_id) {tail}"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(values), |row| {
            Ok((
                IssueRow::from_row(row)?,
                row.get::<_, Option<Vec<u8>>>(ISSUE_COLUMN_COUNT)?,
                row.get::<_, Option<i64>>(ISSUE_COLUMN_COUNT + 1)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut issues = Vec::new();
    for row in rows {
        let (row, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let mut issue = row.into_issue()?;
        issue.text_embedding = joined_embedding(&issue.issue_id, blob, dims)?;
        issues.push(issue);
    }
    Ok(issues)
}

/// Persist the mutable parts of an issue: lifecycle, counters, score, and
/// evidence links. Identity, location, labels, and creation time never
/// change after insert.
pub(crate) fn update_issue_state(conn: &Connection, issue: &Issue) -> CivicResult<()> {
    let id = issue.issue_id.as_str();
    let changed = conn
        .execute(
            "UPDATE issues SET
                status = ?2, closed_by = ?3, closed_at = ?4, updated_at = ?5,
                upvotes = ?6, reports = ?7, impact_score = ?8,
                visibility_radius_m = ?9, evidence_ids = ?10
             WHERE issue_id = ?1",
            params![
                id,
                issue.status.as_str(),
                issue.closed_by,
                issue.closed_at.as_ref().map(ts),
                ts(&issue.updated_at),
                to_json(id, &issue.upvotes)?,
                to_json(id, &issue.reports)?,
                issue.impact_score,
                issue.visibility_radius_m,
                to_json(id, &issue.evidence_ids)?,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if changed == 0 {
        return Err(to_storage_err(format!("issue {id} vanished during update")));
    }
    Ok(())
}
