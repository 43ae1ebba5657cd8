//! Versioned schema migrations tracked through `PRAGMA user_version`.

mod v001_documents;
mod v002_audit_log;

use rusqlite::Connection;
use tracing::info;

use civicfix_core::errors::{CivicResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> CivicResult<()>;

const MIGRATIONS: &[(u32, &str, MigrationFn)] = &[
    (1, "documents", v001_documents::migrate),
    (2, "audit_log", v002_audit_log::migrate),
];

/// Highest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

pub fn current_version(conn: &Connection) -> CivicResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the database's version. Each runs in
/// its own transaction together with the version bump.
pub fn run_migrations(conn: &Connection) -> CivicResult<u32> {
    let mut version = current_version(conn)?;
    for (target, name, migrate) in MIGRATIONS {
        if *target <= version {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration {target} begin: {e}")))?;
        let applied = migrate(&tx).and_then(|()| {
            tx.pragma_update(None, "user_version", target)
                .map_err(|e| to_storage_err(e.to_string()))
        });
        if let Err(e) = applied {
            let _ = tx.rollback();
            return Err(StorageError::MigrationFailed {
                version: *target,
                reason: e.to_string(),
            }
            .into());
        }
        tx.commit()
            .map_err(|e| to_storage_err(format!("migration {target} commit: {e}")))?;
        info!(version = target, name, "applied migration");
        version = *target;
    }
    Ok(version)
}
