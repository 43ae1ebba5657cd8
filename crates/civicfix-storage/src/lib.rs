//! # civicfix-storage
//!
//! SQLite-backed document store for the CivicFix core.
//!
//! One write connection behind a mutex, a round-robin read pool over WAL,
//! versioned migrations, and an append-only audit log. [`StorageEngine`]
//! implements [`IEvidenceStore`](civicfix_core::traits::IEvidenceStore).

pub mod audit;
pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use audit::{AuditEntry, AuditLogger, AuditOperation};
pub use engine::StorageEngine;

use civicfix_core::errors::{CivicError, StorageError};

/// Wrap a SQLite failure message into the crate error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> CivicError {
    CivicError::StorageError(StorageError::SqliteError {
        message: message.into(),
    })
}
