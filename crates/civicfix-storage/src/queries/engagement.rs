//! Community engagement and rescoring as atomic read-modify-write.
//!
//! The whole sequence (read counters, mutate, apply thresholds, rescore,
//! write back) runs in one IMMEDIATE transaction on the single writer, so
//! concurrent upvotes on the same issue never lose an increment.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};
use serde_json::json;
use tracing::info;

use civicfix_core::config::EngagementConfig;
use civicfix_core::constants::COMMUNITY_REPORT_CLOSER;
use civicfix_core::errors::{CivicError, CivicResult};
use civicfix_core::models::{
    EngagementAction, EngagementOutcome, Issue, IssueStatus, StatusTransition,
};
use civicfix_core::traits::RescoreFn;

use super::issue_crud::{get_issue, update_issue_state};
use crate::audit::{AuditLogger, AuditOperation};
use crate::to_storage_err;

/// Apply `action` to the counters only. Returns the status transition a
/// report threshold caused, if any. Spam issues are left untouched.
pub fn apply_action(
    issue: &mut Issue,
    action: EngagementAction,
    thresholds: &EngagementConfig,
    now: DateTime<Utc>,
) -> Option<StatusTransition> {
    let status = issue.status;
    match action {
        EngagementAction::Upvote => issue.upvotes.increment(status),
        EngagementAction::RemoveUpvote => issue.upvotes.decrement(status),
        EngagementAction::Report => issue.reports.increment(status),
    }
    if action != EngagementAction::Report {
        return None;
    }

    match status {
        IssueStatus::Open if issue.reports.open >= thresholds.spam_report_threshold => {
            issue.status = IssueStatus::Closed;
            issue.closed_by = Some(COMMUNITY_REPORT_CLOSER.to_string());
            issue.closed_at = Some(now);
            issue.reports.reset(IssueStatus::Open);
            issue.upvotes.reset(IssueStatus::Open);
        }
        IssueStatus::Closed if issue.reports.closed >= thresholds.reopen_report_threshold => {
            issue.status = IssueStatus::Open;
            issue.closed_by = None;
            issue.closed_at = None;
            issue.reports.reset(IssueStatus::Closed);
            issue.upvotes.reset(IssueStatus::Closed);
        }
        _ => return None,
    }
    Some(StatusTransition {
        from: status,
        to: issue.status,
    })
}

pub fn apply_engagement(
    conn: &Connection,
    issue_id: &str,
    action: EngagementAction,
    thresholds: &EngagementConfig,
    rescore: &RescoreFn,
    now: DateTime<Utc>,
) -> CivicResult<EngagementOutcome> {
    with_immediate_tx(conn, "apply_engagement", |conn| {
        let mut issue = load(conn, issue_id)?;
        if issue.status == IssueStatus::Spam {
            return Ok(EngagementOutcome {
                issue,
                transition: None,
                applied: false,
            });
        }

        let transition = apply_action(&mut issue, action, thresholds, now);
        issue.updated_at = now;
        let assessment = rescore(&issue);
        issue.impact_score = assessment.impact_score;
        issue.visibility_radius_m = assessment.visibility_radius_m;
        update_issue_state(conn, &issue)?;

        AuditLogger::log(
            conn,
            issue_id,
            AuditOperation::Engagement,
            "community",
            json!({
                "action": action,
                "upvotes": issue.upvotes.total(),
                "reports": issue.reports.total(),
                "impact_score": issue.impact_score,
            }),
        )?;
        if let Some(t) = transition {
            info!(issue_id, from = %t.from, to = %t.to, "report threshold changed status");
            AuditLogger::log(
                conn,
                issue_id,
                AuditOperation::StatusChanged,
                "community",
                json!({"from": t.from, "to": t.to}),
            )?;
        }

        Ok(EngagementOutcome {
            issue,
            transition,
            applied: true,
        })
    })
}

/// Recompute impact from the stored counters and write it back.
pub fn refresh_impact(
    conn: &Connection,
    issue_id: &str,
    rescore: &RescoreFn,
    now: DateTime<Utc>,
) -> CivicResult<Issue> {
    with_immediate_tx(conn, "refresh_impact", |conn| {
        let mut issue = load(conn, issue_id)?;
        let assessment = rescore(&issue);
        issue.impact_score = assessment.impact_score;
        issue.visibility_radius_m = assessment.visibility_radius_m;
        issue.updated_at = now;
        update_issue_state(conn, &issue)?;
        AuditLogger::log(
            conn,
            issue_id,
            AuditOperation::ImpactRefreshed,
            "system",
            json!({
                "impact_score": issue.impact_score,
                "visibility_radius_m": issue.visibility_radius_m,
            }),
        )?;
        Ok(issue)
    })
}

fn load(conn: &Connection, issue_id: &str) -> CivicResult<Issue> {
    get_issue(conn, issue_id)?.ok_or_else(|| CivicError::IssueNotFound {
        id: issue_id.to_string(),
    })
}

fn with_immediate_tx<T>(
    conn: &Connection,
    label: &str,
    f: impl FnOnce(&Connection) -> CivicResult<T>,
) -> CivicResult<T> {
    let tx = rusqlite::Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| to_storage_err(format!("{label} begin: {e}")))?;
    match f(&tx) {
        Ok(value) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("{label} commit: {e}")))?;
            Ok(value)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}
