//! v001: issues, issue_embeddings, fixes, fix_embeddings, fix_attempts.

use rusqlite::Connection;

use civicfix_core::errors::CivicResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CivicResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS issues (
            issue_id             TEXT PRIMARY KEY,
            reported_by          TEXT,
            lat                  REAL NOT NULL,
            lon                  REAL NOT NULL,
            created_at           TEXT NOT NULL,
            updated_at           TEXT NOT NULL,
            status               TEXT NOT NULL DEFAULT 'open',
            closed_by            TEXT,
            closed_at            TEXT,
            photo_url            TEXT,
            description          TEXT NOT NULL DEFAULT '',
            auto_caption         TEXT NOT NULL DEFAULT '',
            user_selected_labels TEXT NOT NULL DEFAULT '[]',
            detected_issues      TEXT NOT NULL DEFAULT '[]',
            issue_types          TEXT NOT NULL DEFAULT '[]',
            severity_score       REAL NOT NULL DEFAULT 0,
            fate_risk_co2        REAL NOT NULL DEFAULT 0,
            upvotes              TEXT NOT NULL DEFAULT '{}',
            reports              TEXT NOT NULL DEFAULT '{}',
            impact_score         REAL NOT NULL DEFAULT 0,
            visibility_radius_m  INTEGER NOT NULL DEFAULT 100,
            weather              TEXT,
            evidence_ids         TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_issues_status ON issues(status);
        CREATE INDEX IF NOT EXISTS idx_issues_created ON issues(created_at);
        CREATE INDEX IF NOT EXISTS idx_issues_geo ON issues(lat, lon);

        CREATE TABLE IF NOT EXISTS issue_embeddings (
            issue_id   TEXT PRIMARY KEY REFERENCES issues(issue_id) ON DELETE CASCADE,
            embedding  BLOB NOT NULL,
            dimensions INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS fixes (
            fix_id              TEXT PRIMARY KEY,
            issue_id            TEXT NOT NULL REFERENCES issues(issue_id),
            created_by          TEXT NOT NULL,
            created_at          TEXT NOT NULL,
            title               TEXT NOT NULL DEFAULT '',
            summary             TEXT NOT NULL DEFAULT '',
            image_urls          TEXT NOT NULL DEFAULT '[]',
            photo_count         INTEGER NOT NULL DEFAULT 0,
            co2_saved           REAL NOT NULL DEFAULT 0,
            success_rate        REAL NOT NULL DEFAULT 0,
            related_issue_types TEXT NOT NULL DEFAULT '[]',
            fix_outcomes        TEXT NOT NULL DEFAULT '[]',
            source_doc_ids      TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_fixes_issue ON fixes(issue_id);
        CREATE INDEX IF NOT EXISTS idx_fixes_created ON fixes(created_at);

        CREATE TABLE IF NOT EXISTS fix_embeddings (
            fix_id     TEXT PRIMARY KEY REFERENCES fixes(fix_id) ON DELETE CASCADE,
            embedding  BLOB NOT NULL,
            dimensions INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS fix_attempts (
            attempt_id      TEXT PRIMARY KEY,
            issue_id        TEXT NOT NULL REFERENCES issues(issue_id),
            submitted_by    TEXT NOT NULL,
            submitted_at    TEXT NOT NULL,
            fix_description TEXT NOT NULL DEFAULT '',
            image_urls      TEXT NOT NULL DEFAULT '[]',
            outcome         TEXT NOT NULL,
            verifier_hint   TEXT,
            fix_outcomes    TEXT NOT NULL DEFAULT '[]',
            fix_id          TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_attempts_issue ON fix_attempts(issue_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
