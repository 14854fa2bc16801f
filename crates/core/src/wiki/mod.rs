//! The page repository.
//!
//! [`Wiki`] is the entry point callers use. It normalizes names, moves
//! attachment payloads into the blob store, writes page rows (each with its
//! change record), and keeps the page listing cache honest: every
//! successful mutation invalidates it before returning.
//!
//! Failures are not rolled back across the page table and the blob store.
//! The possible leftovers are:
//!
//! - a blob uploaded by [`Wiki::save_page`] whose page write then failed
//!   (orphaned blob, reclaimed by [`Wiki::sweep_orphaned_files`])
//! - an attachment entry whose blob was deleted by
//!   [`Wiki::delete_attachment`] before the page write failed (dangling
//!   entry; deleting it again succeeds)

mod locks;

pub use locks::PageLocks;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::Error;
use crate::cache::PageListCache;
use crate::config::AppConfig;
use crate::model::{Attachment, AttachmentUpload, ChangeRecord, FileMeta, Page, PageInput};
use crate::search::search_pages;
use crate::slug::normalize_page_name;
use crate::store::WikiDb;

/// Page repository over a [`WikiDb`].
#[derive(Debug)]
pub struct Wiki {
    db: WikiDb,
    cache: PageListCache,
    locks: PageLocks,
    max_attachment_bytes: u64,
}

impl Wiki {
    pub fn new(db: WikiDb, cache: PageListCache, max_attachment_bytes: u64) -> Self {
        Self { db, cache, locks: PageLocks::new(), max_attachment_bytes }
    }

    /// Open the database named by `config` and build a repository around it.
    pub async fn open(config: &AppConfig) -> Result<Self, Error> {
        let db = WikiDb::open(&config.db_path).await?;
        Ok(Self::new(db, PageListCache::new(config.page_list_ttl()), config.max_attachment_bytes))
    }

    pub fn db(&self) -> &WikiDb {
        &self.db
    }

    /// Every page, served from the listing cache when it holds a fresh copy.
    ///
    /// Order is storage order; callers sort.
    pub async fn list_all_pages(&self) -> Result<Arc<Vec<Page>>, Error> {
        if let Some(pages) = self.cache.get().await {
            tracing::debug!(count = pages.len(), "page listing served from cache");
            return Ok(pages);
        }

        let generation = self.cache.generation();
        let pages = Arc::new(self.db.all_pages().await?);
        self.cache.insert_if_current(generation, pages.clone()).await;
        tracing::debug!(count = pages.len(), ttl_secs = self.cache.ttl().as_secs(), "page listing loaded from store");
        Ok(pages)
    }

    /// Look up a page by name, ignoring case. Never cached.
    pub async fn get_page(&self, name: &str) -> Result<Option<Page>, Error> {
        self.db.find_page_by_name(name.trim()).await
    }

    /// Look up a page by id. Never cached.
    pub async fn get_page_by_id(&self, id: i64) -> Result<Option<Page>, Error> {
        self.db.find_page_by_id(id).await
    }

    /// Create (`input.id == None`) or replace a page.
    ///
    /// The name is sanitized and normalized; the content is stored exactly
    /// as given. An attachment payload is uploaded under a fresh file id
    /// before the row is written and appended to the page's attachment list.
    pub async fn save_page(&self, input: PageInput) -> Result<Page, Error> {
        let name = normalize_page_name(&input.name);
        if name.is_empty() {
            tracing::warn!(proposed = %input.name, "rejected page name with no usable characters");
            return Err(Error::InvalidInput(format!("page name {:?} normalizes to an empty name", input.name)));
        }

        let page = match input.id {
            Some(id) => {
                let _guard = self.locks.lock(id).await;
                let existing = self.db.find_page_by_id(id).await?.ok_or(Error::PageNotFound(id))?;

                let mut attachments = existing.attachments;
                let uploaded = match input.attachment {
                    Some(upload) => Some(self.upload_attachment(upload).await?),
                    None => None,
                };
                attachments.extend(uploaded.clone());

                let page = Page { id, name, content: input.content, last_modified_utc: Utc::now(), attachments };
                let change = format!("Edit Page {}", page.name);
                self.db
                    .replace_page(&page, &change)
                    .await
                    .inspect_err(|e| warn_orphaned(uploaded.as_ref(), e))?;
                page
            }
            None => {
                let uploaded = match input.attachment {
                    Some(upload) => Some(self.upload_attachment(upload).await?),
                    None => None,
                };
                let attachments: Vec<Attachment> = uploaded.iter().cloned().collect();

                let change = format!("Create Page {name}");
                self.db
                    .insert_page(&name, &input.content, attachments, Utc::now(), &change)
                    .await
                    .inspect_err(|e| warn_orphaned(uploaded.as_ref(), e))?
            }
        };

        self.cache.invalidate().await;
        tracing::info!(page_id = page.id, name = %page.name, attachments = page.attachments.len(), "saved page");
        Ok(page)
    }

    /// Delete a page and every attachment blob it owns.
    ///
    /// The page named `home_page_name` (compared ignoring case) is refused.
    /// If some blobs cannot be deleted the page row is kept, trimmed to the
    /// attachments that still exist, and `BlobDeleteFailed` is returned.
    pub async fn delete_page(&self, id: i64, home_page_name: &str) -> Result<(), Error> {
        let _guard = self.locks.lock(id).await;
        let mut page = self.db.find_page_by_id(id).await?.ok_or(Error::PageNotFound(id))?;

        if page.name.to_lowercase() == home_page_name.trim().to_lowercase() {
            tracing::warn!(page_id = id, name = %page.name, "refused to delete the home page");
            return Err(Error::HomePageProtected(page.name));
        }

        let mut undeleted = Vec::new();
        for attachment in &page.attachments {
            if !self.remove_blob(&attachment.file_id).await {
                undeleted.push(attachment.file_id.clone());
            }
        }

        if !undeleted.is_empty() {
            let before = page.attachments.len();
            page.attachments.retain(|a| undeleted.contains(&a.file_id));
            if page.attachments.len() != before {
                let change = format!("Delete Attachments from {}", page.name);
                self.db.replace_page(&page, &change).await?;
                self.cache.invalidate().await;
            }
            tracing::warn!(page_id = id, blobs = ?undeleted, "page kept because attachment blobs could not be deleted");
            return Err(Error::BlobDeleteFailed(undeleted.join(", ")));
        }

        self.db.delete_page_row(id, &format!("Delete Page {}", page.name)).await?;
        self.cache.invalidate().await;
        tracing::info!(page_id = id, name = %page.name, "deleted page");
        Ok(())
    }

    /// Remove one attachment from a page, blob first.
    ///
    /// The page's list is only changed once the blob is confirmed gone.
    pub async fn delete_attachment(&self, page_id: i64, file_id: &str) -> Result<Page, Error> {
        let _guard = self.locks.lock(page_id).await;
        let mut page = self
            .db
            .find_page_by_id(page_id)
            .await?
            .ok_or(Error::PageNotFound(page_id))?;

        let Some(index) = page.attachment_index(file_id) else {
            tracing::warn!(page_id, file_id, "attachment not listed on page");
            return Err(Error::AttachmentNotFound { page_id, file_id: file_id.to_string() });
        };

        if !self.remove_blob(file_id).await {
            tracing::warn!(page_id, file_id, "attachment kept because its blob could not be deleted");
            return Err(Error::BlobDeleteFailed(file_id.to_string()));
        }

        let removed = page.attachments.remove(index);
        let change = format!("Delete Attachment {} from {}", removed.file_name, page.name);
        self.db.replace_page(&page, &change).await.inspect_err(|e| {
            tracing::error!(page_id, file_id, error = %e, "blob deleted but page still lists it");
        })?;

        self.cache.invalidate().await;
        tracing::info!(page_id, file_id, "deleted attachment");
        Ok(page)
    }

    /// Pages whose name or content contains `term`, ignoring case.
    pub async fn search(&self, term: &str) -> Result<Vec<Page>, Error> {
        search_pages(&self.db, term).await
    }

    /// Bytes and metadata of an attachment blob.
    pub async fn download_attachment(&self, file_id: &str) -> Result<Option<(FileMeta, Vec<u8>)>, Error> {
        self.db.download_file(file_id).await
    }

    /// Metadata of an attachment blob.
    pub async fn find_attachment_meta(&self, file_id: &str) -> Result<Option<FileMeta>, Error> {
        self.db.find_file_meta(file_id).await
    }

    /// Append an entry to the change log.
    pub async fn add_change_record(&self, name: &str) -> Result<ChangeRecord, Error> {
        self.db.add_change_record(name).await
    }

    /// The whole change log, oldest first.
    pub async fn change_history(&self) -> Result<Vec<ChangeRecord>, Error> {
        self.db.change_history().await
    }

    /// Delete blobs that no page references and that were uploaded more than
    /// `grace` ago. Returns how many were deleted.
    ///
    /// The grace period keeps the sweep away from blobs whose page write is
    /// still in flight. A negative grace, or one reaching past the earliest
    /// representable time, is `InvalidInput`.
    pub async fn sweep_orphaned_files(&self, grace: chrono::Duration) -> Result<u64, Error> {
        if grace < chrono::Duration::zero() {
            return Err(Error::InvalidInput(format!("sweep grace period must not be negative, got {grace}")));
        }
        let cutoff = Utc::now()
            .checked_sub_signed(grace)
            .ok_or_else(|| Error::InvalidInput(format!("sweep grace period {grace} is out of range")))?;

        let referenced: HashSet<String> = self
            .db
            .all_pages()
            .await?
            .iter()
            .flat_map(|page| page.attachments.iter().map(|a| a.file_id.to_lowercase()))
            .collect();

        let mut deleted = 0;
        for file in self.db.list_file_meta().await? {
            if file.uploaded_at > cutoff || referenced.contains(&file.file_id.to_lowercase()) {
                continue;
            }
            if self.db.delete_file(&file.file_id).await {
                deleted += 1;
            }
        }

        if deleted > 0 {
            self.db.add_change_record(&format!("Sweep {deleted} Orphaned Files")).await?;
            tracing::info!(deleted, "swept orphaned attachment blobs");
        }
        Ok(deleted)
    }

    async fn upload_attachment(&self, upload: AttachmentUpload) -> Result<Attachment, Error> {
        let file_id = Uuid::new_v4().to_string();
        let limit = self.max_attachment_bytes;
        let meta = self
            .db
            .upload_file(&file_id, &upload.file_name, &upload.mime_type, upload.data.as_slice(), limit)
            .await?;

        Ok(Attachment {
            file_id: meta.file_id,
            file_name: meta.file_name,
            mime_type: meta.mime_type,
            last_modified_utc: meta.uploaded_at,
        })
    }

    /// Delete a blob, treating one that is already absent as deleted.
    async fn remove_blob(&self, file_id: &str) -> bool {
        if self.db.delete_file(file_id).await {
            return true;
        }
        matches!(self.db.find_file_meta(file_id).await, Ok(None))
    }
}

fn warn_orphaned(uploaded: Option<&Attachment>, error: &Error) {
    if let Some(attachment) = uploaded {
        tracing::warn!(
            file_id = %attachment.file_id,
            error = %error,
            "page write failed after upload; blob is orphaned"
        );
    }
}
