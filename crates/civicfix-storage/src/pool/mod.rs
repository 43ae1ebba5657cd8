//! Connection management: one writer, optional read pool.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use civicfix_core::errors::CivicResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

pub struct ConnectionPool {
    pub writer: WriteConnection,
    /// `None` for in-memory databases, where a second connection would see
    /// a separate, empty database.
    pub readers: Option<ReadPool>,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open the writer first so the file exists (and is in WAL mode) before
    /// the read-only connections attach.
    pub fn open(path: &Path, read_pool_size: usize, busy_timeout_ms: u32) -> CivicResult<Self> {
        let writer = WriteConnection::open(path, busy_timeout_ms)?;
        let readers = ReadPool::open(path, read_pool_size, busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers: Some(readers),
            db_path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory(busy_timeout_ms: u32) -> CivicResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory(busy_timeout_ms)?,
            readers: None,
            db_path: None,
        })
    }
}
