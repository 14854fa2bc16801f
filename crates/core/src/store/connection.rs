//! Opening the wiki database.
//!
//! Both file-backed and in-memory handles go through the same setup: WAL
//! journaling for readers alongside the single writer thread, then any
//! pending schema migrations.

use std::path::Path;

use tokio_rusqlite::Connection;

use super::migrations;
use crate::Error;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Handle to the wiki database.
///
/// Statements run on the tokio-rusqlite background thread, one at a time.
/// Clones share that thread.
#[derive(Clone, Debug)]
pub struct WikiDb {
    pub(crate) conn: Connection,
}

impl WikiDb {
    /// Open (or create) the wiki database file at `path`.
    ///
    /// A missing parent directory is created first.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        let db = Self::prepare(conn).await?;
        tracing::debug!(path = %path.display(), "opened wiki database");
        Ok(db)
    }

    /// A private database that lives as long as the handle. Used by tests.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().await.map_err(|e| Error::Database(e.into()))?;
        Self::prepare(conn).await
    }

    async fn prepare(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| conn.execute_batch(PRAGMAS)).await.map_err(Error::Database)?;
        migrations::run(&conn).await?;
        Ok(Self { conn })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_is_migrated() {
        let db = WikiDb::open_in_memory().await.unwrap();
        assert!(db.all_pages().await.unwrap().is_empty());
        assert!(db.change_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_database_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let db = WikiDb::open(dir.path().join("wiki.sqlite")).await.unwrap();

        let mode = db
            .conn
            .call(|conn| conn.query_row("PRAGMA journal_mode", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_open_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wiki.sqlite");

        WikiDb::open(&path).await.unwrap();

        assert!(path.exists());
    }
}
