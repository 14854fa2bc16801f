//! Records persisted by the wiki store and the input shapes callers hand in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A wiki page.
///
/// `name` is the canonical slug produced by [`crate::slug::normalize_page_name`];
/// `content` is raw Markdown exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub last_modified_utc: DateTime<Utc>,
    pub attachments: Vec<Attachment>,
}

impl Page {
    /// Position of the attachment with `file_id`, compared case-insensitively.
    pub fn attachment_index(&self, file_id: &str) -> Option<usize> {
        self.attachments
            .iter()
            .position(|a| a.file_id.eq_ignore_ascii_case(file_id))
    }
}

/// An attachment entry embedded in a page's attachment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Key into the file store; independent of the owning page id.
    pub file_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub last_modified_utc: DateTime<Utc>,
}

/// One entry of the append-only change log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub name: String,
    pub date: DateTime<Utc>,
}

/// Metadata stored alongside an attachment blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub file_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub length: u64,
    /// Hex-encoded SHA-256 of the stored bytes.
    pub sha256: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A page submission from the caller.
///
/// `id: None` creates a page, `Some(id)` replaces the existing one.
#[derive(Debug, Clone, Default)]
pub struct PageInput {
    pub id: Option<i64>,
    pub name: String,
    pub content: String,
    pub attachment: Option<AttachmentUpload>,
}

/// File payload accompanying a page save.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    /// Empty means `application/octet-stream`.
    pub mime_type: String,
    pub data: Vec<u8>,
}
