// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through the writer connection's single
//! background thread. Reads use a separate read-only connection so list and
//! stats queries are not queued behind a long reconcile.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;
use std::time::Duration;

use jobdeck_core::JobdeckError;
use rusqlite::OpenFlags;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Convert a tokio-rusqlite error into `JobdeckError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> JobdeckError {
    JobdeckError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the jobdeck SQLite database.
pub struct Database {
    writer: Connection,
    reader: Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, JobdeckError> {
        Self::open_with(path, true).await
    }

    /// Open the database, choosing the journal mode explicitly.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, JobdeckError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| JobdeckError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let writer = Connection::open(path)
            .await
            .map_err(|e| JobdeckError::Storage {
                source: Box::new(e),
            })?;

        writer
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.busy_timeout(BUSY_TIMEOUT)?;
                if wal_mode {
                    let mode: String = conn.pragma_update_and_check(
                        None,
                        "journal_mode",
                        "WAL",
                        |row| row.get(0),
                    )?;
                    debug!(journal_mode = %mode, "journal mode set");
                }
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.pragma_update(None, "foreign_keys", "ON")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        writer
            .call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e| JobdeckError::Storage {
                source: Box::new(e),
            })?;

        let reader = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        )
        .await
        .map_err(|e| JobdeckError::Storage {
            source: Box::new(e),
        })?;

        reader
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.busy_timeout(BUSY_TIMEOUT)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { writer, reader })
    }

    /// The single write connection.
    pub fn writer(&self) -> &Connection {
        &self.writer
    }

    /// The read-only connection.
    pub fn reader(&self) -> &Connection {
        &self.reader
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), JobdeckError> {
        self.writer
            .call(|conn| -> Result<(), rusqlite::Error> {
                // wal_checkpoint returns a row; query it rather than execute.
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and release both connections.
    pub async fn close(self) -> Result<(), JobdeckError> {
        self.checkpoint().await?;
        self.reader.close().await.map_err(|e| JobdeckError::Storage {
            source: Box::new(e),
        })?;
        self.writer.close().await.map_err(|e| JobdeckError::Storage {
            source: Box::new(e),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("jobs.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_enables_wal_mode() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("wal.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let mode: String = db
            .writer()
            .call(|conn| -> Result<String, rusqlite::Error> {
                conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reader_cannot_write() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("ro.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let result = db
            .reader()
            .call(|conn| -> Result<usize, rusqlite::Error> {
                conn.execute("DELETE FROM postings", [])
            })
            .await;
        assert!(result.is_err());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();
        Database::open(path).await.unwrap().close().await.unwrap();
        Database::open(path).await.unwrap().close().await.unwrap();
    }
}
