//! Append-only change log.

use chrono::Utc;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::WikiDb;
use super::{format_timestamp, parse_timestamp};
use crate::Error;
use crate::model::ChangeRecord;

/// Append a change record on an open connection or transaction.
pub(crate) fn append_change(conn: &rusqlite::Connection, name: &str, date: &str) -> rusqlite::Result<()> {
    conn.execute("INSERT INTO change_history (name, date) VALUES (?1, ?2)", params![name, date])?;
    Ok(())
}

impl WikiDb {
    /// Append a change record stamped with the current time.
    pub async fn add_change_record(&self, name: &str) -> Result<ChangeRecord, Error> {
        let record = ChangeRecord { name: name.to_string(), date: Utc::now() };
        let name = record.name.clone();
        let date = format_timestamp(&record.date);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                append_change(conn, &name, &date)?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(record)
    }

    /// Every change record in insertion order.
    pub async fn change_history(&self) -> Result<Vec<ChangeRecord>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<ChangeRecord>, Error> {
                let mut stmt = conn.prepare("SELECT name, date FROM change_history ORDER BY seq")?;
                let records = stmt
                    .query_map([], |row| {
                        let date: String = row.get(1)?;
                        Ok(ChangeRecord { name: row.get(0)?, date: parse_timestamp(1, &date)? })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_history_preserves_insertion_order() {
        let db = WikiDb::open_in_memory().await.unwrap();
        for name in ["Create Page a", "Edit Page a", "Delete Page a"] {
            db.add_change_record(name).await.unwrap();
        }

        let history = db.change_history().await.unwrap();
        let names: Vec<&str> = history.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Create Page a", "Edit Page a", "Delete Page a"]);
        assert!(history.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[tokio::test]
    async fn test_empty_history() {
        let db = WikiDb::open_in_memory().await.unwrap();
        assert!(db.change_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_returns_stored_record() {
        let db = WikiDb::open_in_memory().await.unwrap();
        let record = db.add_change_record("Create Page home").await.unwrap();

        let stored = db.change_history().await.unwrap();
        assert_eq!(stored, vec![record]);
    }
}
