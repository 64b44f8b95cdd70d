//! SQLite database handle.
//!
//! Wraps an r2d2 connection pool over rusqlite. Each operation checks a
//! connection out of the pool for its own duration, so acquisition is
//! scoped to the request that triggered it and released on drop.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn new(path: &str) -> DbResult<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::new(manager)?;

        let conn = pool.get()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT,
                tags TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_title ON notes (title)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_created_at ON notes (created_at)",
            [],
        )?;

        Ok(Self { pool })
    }

    /// Check a connection out of the pool for a single operation.
    pub(crate) fn conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }
}
