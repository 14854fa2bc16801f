//! Page row CRUD.
//!
//! Each write takes the change-log entry describing it and appends that
//! entry in the same transaction, so the log never records an action whose
//! row write was rolled back.

use chrono::{DateTime, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};

use super::connection::WikiDb;
use super::history::append_change;
use super::{format_timestamp, parse_timestamp};
use crate::Error;
use crate::model::{Attachment, Page};

const PAGE_COLUMNS: &str = "id, name, content, last_modified_utc, attachments_json";

/// Map a row selected with [`PAGE_COLUMNS`] to a [`Page`].
fn row_to_page(row: &rusqlite::Row<'_>) -> rusqlite::Result<Page> {
    let modified: String = row.get(3)?;
    let attachments_json: String = row.get(4)?;
    let attachments: Vec<Attachment> = serde_json::from_str(&attachments_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Page {
        id: row.get(0)?,
        name: row.get(1)?,
        content: row.get(2)?,
        last_modified_utc: parse_timestamp(3, &modified)?,
        attachments,
    })
}

impl WikiDb {
    /// Insert a new page row and return it with its assigned id.
    pub async fn insert_page(
        &self, name: &str, content: &str, attachments: Vec<Attachment>, modified: DateTime<Utc>, change: &str,
    ) -> Result<Page, Error> {
        let attachments_json = serde_json::to_string(&attachments)?;
        let row_name = name.to_string();
        let row_content = content.to_string();
        let row_modified = format_timestamp(&modified);
        let change = change.to_string();

        let id = self
            .conn
            .call(move |conn| -> Result<i64, Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO pages (name, content, last_modified_utc, attachments_json)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![row_name, row_content, row_modified, attachments_json],
                )?;
                let id = tx.last_insert_rowid();
                append_change(&tx, &change, &row_modified)?;
                tx.commit()?;
                Ok(id)
            })
            .await
            .map_err(Error::from)?;

        Ok(Page { id, name: name.to_string(), content: content.to_string(), last_modified_utc: modified, attachments })
    }

    /// Replace every column of an existing page row.
    ///
    /// Returns `PageNotFound` if no row has `page.id`.
    pub async fn replace_page(&self, page: &Page, change: &str) -> Result<(), Error> {
        let attachments_json = serde_json::to_string(&page.attachments)?;
        let id = page.id;
        let name = page.name.clone();
        let content = page.content.clone();
        let modified = format_timestamp(&page.last_modified_utc);
        let change = change.to_string();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                let updated = tx.execute(
                    "UPDATE pages SET name = ?2, content = ?3, last_modified_utc = ?4, attachments_json = ?5
                     WHERE id = ?1",
                    params![id, name, content, modified, attachments_json],
                )?;
                if updated == 0 {
                    return Err(Error::PageNotFound(id));
                }
                append_change(&tx, &change, &modified)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a page row.
    ///
    /// Returns `PageNotFound` if no row has `id`.
    pub async fn delete_page_row(&self, id: i64, change: &str) -> Result<(), Error> {
        let change = change.to_string();
        let now = format_timestamp(&Utc::now());

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                let deleted = tx.execute("DELETE FROM pages WHERE id = ?1", params![id])?;
                if deleted == 0 {
                    return Err(Error::PageNotFound(id));
                }
                append_change(&tx, &change, &now)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a page by id.
    pub async fn find_page_by_id(&self, id: i64) -> Result<Option<Page>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<Page>, Error> {
                let page = conn
                    .query_row(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?1"), params![id], row_to_page)
                    .optional()?;
                Ok(page)
            })
            .await
            .map_err(Error::from)
    }

    /// Get a page by name, ignoring case.
    ///
    /// Names are not unique at the schema level; when several rows share a
    /// name the oldest (lowest id) wins.
    pub async fn find_page_by_name(&self, name: &str) -> Result<Option<Page>, Error> {
        let name = name.to_lowercase();
        self.conn
            .call(move |conn| -> Result<Option<Page>, Error> {
                let page = conn
                    .query_row(
                        &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE name = ?1 ORDER BY id LIMIT 1"),
                        params![name],
                        row_to_page,
                    )
                    .optional()?;
                Ok(page)
            })
            .await
            .map_err(Error::from)
    }

    /// Load every page row.
    pub async fn all_pages(&self) -> Result<Vec<Page>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<Page>, Error> {
                let mut stmt = conn.prepare(&format!("SELECT {PAGE_COLUMNS} FROM pages ORDER BY id"))?;
                let pages = stmt
                    .query_map([], row_to_page)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(pages)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(file_id: &str) -> Attachment {
        Attachment {
            file_id: file_id.to_string(),
            file_name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
            last_modified_utc: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = WikiDb::open_in_memory().await.unwrap();
        let page = db
            .insert_page("intro", "# Intro", vec![attachment("f1")], Utc::now(), "Create Page intro")
            .await
            .unwrap();

        assert!(page.id > 0);
        let by_id = db.find_page_by_id(page.id).await.unwrap().unwrap();
        assert_eq!(by_id, page);

        let by_name = db.find_page_by_name("INTRO").await.unwrap().unwrap();
        assert_eq!(by_name.id, page.id);
        assert_eq!(by_name.attachments.len(), 1);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let db = WikiDb::open_in_memory().await.unwrap();
        assert!(db.find_page_by_id(99).await.unwrap().is_none());
        assert!(db.find_page_by_name("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_names_resolve_to_oldest() {
        let db = WikiDb::open_in_memory().await.unwrap();
        let first = db.insert_page("dup", "one", vec![], Utc::now(), "c").await.unwrap();
        db.insert_page("dup", "two", vec![], Utc::now(), "c").await.unwrap();

        let found = db.find_page_by_name("dup").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.content, "one");
    }

    #[tokio::test]
    async fn test_replace_page() {
        let db = WikiDb::open_in_memory().await.unwrap();
        let mut page = db.insert_page("draft", "old", vec![], Utc::now(), "c").await.unwrap();

        page.content = "new".to_string();
        page.attachments.push(attachment("f2"));
        db.replace_page(&page, "Edit Page draft").await.unwrap();

        let stored = db.find_page_by_id(page.id).await.unwrap().unwrap();
        assert_eq!(stored.content, "new");
        assert_eq!(stored.attachments[0].file_id, "f2");
    }

    #[tokio::test]
    async fn test_replace_missing_page() {
        let db = WikiDb::open_in_memory().await.unwrap();
        let page = Page {
            id: 7,
            name: "ghost".into(),
            content: String::new(),
            last_modified_utc: Utc::now(),
            attachments: vec![],
        };

        let result = db.replace_page(&page, "Edit Page ghost").await;
        assert!(matches!(result, Err(Error::PageNotFound(7))));
        assert!(db.change_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_page_row() {
        let db = WikiDb::open_in_memory().await.unwrap();
        let page = db.insert_page("gone", "", vec![], Utc::now(), "c").await.unwrap();

        db.delete_page_row(page.id, "Delete Page gone").await.unwrap();
        assert!(db.find_page_by_id(page.id).await.unwrap().is_none());

        let again = db.delete_page_row(page.id, "Delete Page gone").await;
        assert!(matches!(again, Err(Error::PageNotFound(_))));
    }

    #[tokio::test]
    async fn test_writes_append_change_records() {
        let db = WikiDb::open_in_memory().await.unwrap();
        let page = db.insert_page("log", "", vec![], Utc::now(), "Create Page log").await.unwrap();
        db.delete_page_row(page.id, "Delete Page log").await.unwrap();

        let names: Vec<String> = db.change_history().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Create Page log", "Delete Page log"]);
    }
}
