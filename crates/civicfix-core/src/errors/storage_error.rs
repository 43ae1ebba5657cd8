/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("document serialization failed for {id}: {reason}")]
    Serialization { id: String, reason: String },

    #[error("document {id} already exists")]
    Conflict { id: String },

    #[error("stored embedding for {id} is corrupt: {reason}")]
    CorruptEmbedding { id: String, reason: String },
}
