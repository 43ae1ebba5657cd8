//! Prompt-sized evidence views of issues and fixes.

use civicfix_core::models::{truncate_excerpt, EvidenceKind, EvidenceSnippet, FixRecord, Issue};

pub fn issue_snippet(issue: &Issue, max_chars: usize) -> EvidenceSnippet {
    let text = if issue.description.trim().is_empty() {
        &issue.auto_caption
    } else {
        &issue.description
    };
    EvidenceSnippet {
        id: issue.issue_id.clone(),
        kind: EvidenceKind::Issue,
        labels: issue.issue_types.clone(),
        severity_score: Some(issue.severity_score),
        co2_saved: None,
        success_rate: None,
        excerpt: truncate_excerpt(text.trim(), max_chars),
        recorded_at: issue.created_at,
    }
}

pub fn fix_snippet(fix: &FixRecord, max_chars: usize) -> EvidenceSnippet {
    let text = if fix.summary.trim().is_empty() {
        &fix.title
    } else {
        &fix.summary
    };
    EvidenceSnippet {
        id: fix.fix_id.clone(),
        kind: EvidenceKind::Fix,
        labels: fix.related_issue_types.clone(),
        severity_score: None,
        co2_saved: Some(fix.co2_saved),
        success_rate: Some(fix.success_rate),
        excerpt: truncate_excerpt(text.trim(), max_chars),
        recorded_at: fix.created_at,
    }
}
