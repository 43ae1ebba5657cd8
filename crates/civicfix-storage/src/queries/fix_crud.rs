//! Fix records, their embeddings, and fix attempts.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::json;

use civicfix_core::errors::{CivicError, CivicResult, StorageError};
use civicfix_core::models::{FixAttempt, FixRecord, Issue, IssueStatus};

use super::issue_crud::{get_issue, update_issue_state};
use super::{bytes_to_f32_vec, f32_vec_to_bytes, from_json, joined_embedding, parse_ts, to_json, ts};
use crate::audit::{AuditLogger, AuditOperation};
use crate::to_storage_err;

pub(crate) const FIX_COLUMNS: &str = "fix_id, issue_id, created_by, created_at, title, summary, \
     image_urls, photo_count, co2_saved, success_rate, related_issue_types, fix_outcomes, \
     source_doc_ids";
const FIX_COLUMN_COUNT: usize = 13;

pub(crate) struct FixRow {
    fix_id: String,
    issue_id: String,
    created_by: String,
    created_at: String,
    title: String,
    summary: String,
    image_urls: String,
    photo_count: i64,
    co2_saved: f64,
    success_rate: f64,
    related_issue_types: String,
    fix_outcomes: String,
    source_doc_ids: String,
}

impl FixRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            fix_id: row.get(0)?,
            issue_id: row.get(1)?,
            created_by: row.get(2)?,
            created_at: row.get(3)?,
            title: row.get(4)?,
            summary: row.get(5)?,
            image_urls: row.get(6)?,
            photo_count: row.get(7)?,
            co2_saved: row.get(8)?,
            success_rate: row.get(9)?,
            related_issue_types: row.get(10)?,
            fix_outcomes: row.get(11)?,
            source_doc_ids: row.get(12)?,
        })
    }

    pub(crate) fn into_fix(self) -> CivicResult<FixRecord> {
        let id = self.fix_id.as_str();
        Ok(FixRecord {
            created_at: parse_ts(&self.created_at)?,
            image_urls: from_json(id, &self.image_urls)?,
            related_issue_types: from_json(id, &self.related_issue_types)?,
            fix_outcomes: from_json(id, &self.fix_outcomes)?,
            source_doc_ids: from_json(id, &self.source_doc_ids)?,
            issue_id: self.issue_id,
            created_by: self.created_by,
            title: self.title,
            summary: self.summary,
            photo_count: self.photo_count.max(0) as usize,
            co2_saved: self.co2_saved,
            success_rate: self.success_rate,
            text_embedding: None,
            fix_id: self.fix_id,
        })
    }
}

/// Insert the fix, close its issue, and link the fix into the issue's
/// evidence, all in one transaction. The issue must be open.
pub fn close_with_fix(
    conn: &Connection,
    fix: &FixRecord,
    closed_at: DateTime<Utc>,
) -> CivicResult<Issue> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("close_with_fix begin: {e}")))?;

    match close_with_fix_inner(&tx, fix, closed_at) {
        Ok(issue) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("close_with_fix commit: {e}")))?;
            Ok(issue)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn close_with_fix_inner(
    conn: &Connection,
    fix: &FixRecord,
    closed_at: DateTime<Utc>,
) -> CivicResult<Issue> {
    let mut issue = get_issue(conn, &fix.issue_id)?.ok_or_else(|| CivicError::IssueNotFound {
        id: fix.issue_id.clone(),
    })?;
    if issue.status != IssueStatus::Open {
        return Err(CivicError::InvalidTransition {
            issue_id: issue.issue_id,
            status: issue.status.to_string(),
            action: "close".into(),
        });
    }

    insert_fix(conn, fix)?;

    issue.status = IssueStatus::Closed;
    issue.closed_by = Some(fix.created_by.clone());
    issue.closed_at = Some(closed_at);
    issue.updated_at = closed_at;
    if !issue.evidence_ids.contains(&fix.fix_id) {
        issue.evidence_ids.push(fix.fix_id.clone());
    }
    update_issue_state(conn, &issue)?;

    AuditLogger::log(
        conn,
        &issue.issue_id,
        AuditOperation::FixApplied,
        &fix.created_by,
        json!({"fix_id": fix.fix_id, "success_rate": fix.success_rate}),
    )?;
    Ok(issue)
}

fn insert_fix(conn: &Connection, fix: &FixRecord) -> CivicResult<()> {
    let id = fix.fix_id.as_str();
    let duplicate = conn
        .query_row("SELECT 1 FROM fixes WHERE fix_id = ?1", params![id], |_| Ok(()))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    if duplicate.is_some() {
        return Err(StorageError::Conflict { id: id.to_string() }.into());
    }

    conn.execute(
        &format!(
            "INSERT INTO fixes ({FIX_COLUMNS}) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13
            )"
        ),
        params![
            id,
            fix.issue_id,
            fix.created_by,
            ts(&fix.created_at),
            fix.title,
            fix.summary,
            to_json(id, &fix.image_urls)?,
            fix.photo_count as i64,
            fix.co2_saved,
            fix.success_rate,
            to_json(id, &fix.related_issue_types)?,
            to_json(id, &fix.fix_outcomes)?,
            to_json(id, &fix.source_doc_ids)?,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    if let Some(embedding) = &fix.text_embedding {
        conn.execute(
            "INSERT INTO fix_embeddings (fix_id, embedding, dimensions) VALUES (?1, ?2, ?3)",
            params![id, f32_vec_to_bytes(embedding), embedding.len() as i64],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

pub fn get_fix(conn: &Connection, fix_id: &str) -> CivicResult<Option<FixRecord>> {
    let row = conn
        .query_row(
            &format!("SELECT {FIX_COLUMNS} FROM fixes WHERE fix_id = ?1"),
            params![fix_id],
            FixRow::from_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some(row) = row else {
        return Ok(None);
    };
    let mut fix = row.into_fix()?;
    fix.text_embedding = get_fix_embedding(conn, fix_id)?;
    Ok(Some(fix))
}

pub fn get_fix_embedding(conn: &Connection, fix_id: &str) -> CivicResult<Option<Vec<f32>>> {
    let row: Option<(Vec<u8>, i64)> = conn
        .query_row(
            "SELECT embedding, dimensions FROM fix_embeddings WHERE fix_id = ?1",
            params![fix_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.map(|(blob, dims)| bytes_to_f32_vec(fix_id, &blob, dims as usize))
        .transpose()
}

/// Run `SELECT {FIX_COLUMNS} FROM fixes {tail}` with each fix's stored
/// embedding joined in.
pub(crate) fn select_fixes_with_embeddings(
    conn: &Connection,
    tail: &str,
    values: Vec<Value>,
) -> CivicResult<Vec<FixRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FIX_COLUMNS}, embedding, dimensions \
             FROM fixes LEFT JOIN fix_embeddings USING (fix_id) {tail}"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(values), |row| {
            Ok((
                FixRow::from_row(row)?,
                row.get::<_, Option<Vec<u8>>>(FIX_COLUMN_COUNT)?,
                row.get::<_, Option<i64>>(FIX_COLUMN_COUNT + 1)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut fixes = Vec::new();
    for row in rows {
        let (row, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let mut fix = row.into_fix()?;
        fix.text_embedding = joined_embedding(&fix.fix_id, blob, dims)?;
        fixes.push(fix);
    }
    Ok(fixes)
}

pub fn record_fix_attempt(conn: &Connection, attempt: &FixAttempt) -> CivicResult<()> {
    let id = attempt.attempt_id.as_str();
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("record_fix_attempt begin: {e}")))?;

    let written = tx
        .execute(
            "INSERT INTO fix_attempts (
                attempt_id, issue_id, submitted_by, submitted_at, fix_description,
                image_urls, outcome, verifier_hint, fix_outcomes, fix_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                attempt.issue_id,
                attempt.submitted_by,
                ts(&attempt.submitted_at),
                attempt.fix_description,
                to_json(id, &attempt.image_urls)?,
                to_json(id, &attempt.outcome)?,
                attempt.verifier_hint.as_ref().map(|h| to_json(id, h)).transpose()?,
                to_json(id, &attempt.fix_outcomes)?,
                attempt.fix_id,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))
        .and_then(|_| {
            AuditLogger::log(
                &tx,
                &attempt.issue_id,
                AuditOperation::FixAttemptRecorded,
                &attempt.submitted_by,
                json!({"attempt_id": id, "outcome": attempt.outcome}),
            )
        });

    match written {
        Ok(()) => tx
            .commit()
            .map_err(|e| to_storage_err(format!("record_fix_attempt commit: {e}"))),
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Attempts for an issue, oldest first.
pub fn fix_attempts_for(conn: &Connection, issue_id: &str) -> CivicResult<Vec<FixAttempt>> {
    let mut stmt = conn
        .prepare(
            "SELECT attempt_id, issue_id, submitted_by, submitted_at, fix_description,
                    image_urls, outcome, verifier_hint, fix_outcomes, fix_id
             FROM fix_attempts WHERE issue_id = ?1 ORDER BY submitted_at ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    type AttemptRow = (
        String,
        String,
        String,
        String,
        String,
        String,
        String,
        Option<String>,
        String,
        Option<String>,
    );
    let rows = stmt
        .query_map(params![issue_id], |row| -> rusqlite::Result<AttemptRow> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut attempts = Vec::new();
    for row in rows {
        let (
            attempt_id,
            issue_id,
            submitted_by,
            submitted_at,
            fix_description,
            image_urls,
            outcome,
            verifier_hint,
            fix_outcomes,
            fix_id,
        ) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let id = attempt_id.as_str();
        attempts.push(FixAttempt {
            submitted_at: parse_ts(&submitted_at)?,
            image_urls: from_json(id, &image_urls)?,
            outcome: from_json(id, &outcome)?,
            verifier_hint: verifier_hint.as_deref().map(|h| from_json(id, h)).transpose()?,
            fix_outcomes: from_json(id, &fix_outcomes)?,
            issue_id,
            submitted_by,
            fix_description,
            fix_id,
            attempt_id,
        });
    }
    Ok(attempts)
}
