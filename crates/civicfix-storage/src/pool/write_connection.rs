//! The single write connection behind `tokio::sync::Mutex`. SQLite allows
//! one writer at a time, so writes serialize here.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;

use civicfix_core::errors::CivicResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, busy_timeout_ms: u32) -> CivicResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory(busy_timeout_ms: u32) -> CivicResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and run `f` with the connection.
    pub async fn with_conn<F, T>(&self, f: F) -> CivicResult<T>
    where
        F: FnOnce(&Connection) -> CivicResult<T>,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }

    /// Blocking access for callers outside an async runtime. Panics when
    /// called from inside one; use [`Self::with_conn`] there.
    pub fn with_conn_sync<F, T>(&self, f: F) -> CivicResult<T>
    where
        F: FnOnce(&Connection) -> CivicResult<T>,
    {
        let guard = self.conn.blocking_lock();
        f(&guard)
    }

    /// Lock-free access while the writer is still exclusively owned, for
    /// startup work such as migrations.
    pub fn with_conn_mut<F, T>(&mut self, f: F) -> CivicResult<T>
    where
        F: FnOnce(&Connection) -> CivicResult<T>,
    {
        f(self.conn.get_mut())
    }
}
