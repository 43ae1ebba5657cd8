//! v002: audit_log.

use rusqlite::Connection;

use civicfix_core::errors::CivicResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CivicResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS audit_log (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            entity_id   TEXT NOT NULL,
            operation   TEXT NOT NULL,
            actor       TEXT NOT NULL DEFAULT 'system',
            details     TEXT NOT NULL DEFAULT '{}',
            timestamp   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_audit_entity ON audit_log(entity_id);
        CREATE INDEX IF NOT EXISTS idx_audit_operation ON audit_log(operation);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
