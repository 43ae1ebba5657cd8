//! Append-only audit log. Every mutating store operation writes one entry
//! inside the same transaction as the mutation.

use std::fmt;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use civicfix_core::errors::CivicResult;

use crate::queries::{parse_ts, ts};
use crate::to_storage_err;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    IssueCreated,
    Engagement,
    StatusChanged,
    ImpactRefreshed,
    FixApplied,
    FixAttemptRecorded,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IssueCreated => "issue_created",
            Self::Engagement => "engagement",
            Self::StatusChanged => "status_changed",
            Self::ImpactRefreshed => "impact_refreshed",
            Self::FixApplied => "fix_applied",
            Self::FixAttemptRecorded => "fix_attempt_recorded",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "issue_created" => Self::IssueCreated,
            "engagement" => Self::Engagement,
            "status_changed" => Self::StatusChanged,
            "impact_refreshed" => Self::ImpactRefreshed,
            "fix_applied" => Self::FixApplied,
            "fix_attempt_recorded" => Self::FixAttemptRecorded,
            _ => return None,
        })
    }
}

impl fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entity_id: String,
    pub operation: AuditOperation,
    pub actor: String,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

pub struct AuditLogger;

impl AuditLogger {
    pub fn log(
        conn: &Connection,
        entity_id: &str,
        operation: AuditOperation,
        actor: &str,
        details: serde_json::Value,
    ) -> CivicResult<()> {
        conn.execute(
            "INSERT INTO audit_log (entity_id, operation, actor, details, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entity_id,
                operation.as_str(),
                actor,
                details.to_string(),
                ts(&Utc::now()),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(())
    }

    /// Entries for one issue or fix, oldest first.
    pub fn entries_for(conn: &Connection, entity_id: &str) -> CivicResult<Vec<AuditEntry>> {
        let mut stmt = conn
            .prepare(
                "SELECT entity_id, operation, actor, details, timestamp
                 FROM audit_log WHERE entity_id = ?1 ORDER BY id ASC",
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        let rows = stmt
            .query_map(params![entity_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(|e| to_storage_err(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            let (entity_id, operation, actor, details, timestamp) =
                row.map_err(|e| to_storage_err(e.to_string()))?;
            let Some(operation) = AuditOperation::parse(&operation) else {
                tracing::warn!(entity_id, operation, "skipping unknown audit operation");
                continue;
            };
            entries.push(AuditEntry {
                entity_id,
                operation,
                actor,
                details: serde_json::from_str(&details).unwrap_or(serde_json::Value::Null),
                timestamp: parse_ts(&timestamp)?,
            });
        }
        Ok(entries)
    }
}
