//! Attachment blob storage.
//!
//! Blobs live in the `files` table keyed by a caller-generated file id and
//! carry their own name, MIME type and SHA-256 digest. Page rows refer to
//! them only by id.

use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};

use super::connection::WikiDb;
use super::{format_timestamp, parse_timestamp};
use crate::Error;
use crate::model::FileMeta;

/// MIME type recorded when the uploader supplies none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

const META_COLUMNS: &str = "file_id, file_name, mime_type, length, sha256, uploaded_at";

fn row_to_meta(row: &rusqlite::Row<'_>) -> rusqlite::Result<FileMeta> {
    let uploaded_at: String = row.get(5)?;
    Ok(FileMeta {
        file_id: row.get(0)?,
        file_name: row.get(1)?,
        mime_type: row.get(2)?,
        length: row.get::<_, i64>(3)? as u64,
        sha256: row.get(4)?,
        uploaded_at: parse_timestamp(5, &uploaded_at)?,
    })
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

impl WikiDb {
    /// Store the bytes read from `reader` under `file_id`.
    ///
    /// Reads at most `max_bytes`; a longer stream fails with
    /// `AttachmentTooLarge` before anything is written. `file_id` must be
    /// unique; reusing one is a store error.
    pub async fn upload_file<R>(
        &self, file_id: &str, file_name: &str, mime_type: &str, reader: R, max_bytes: u64,
    ) -> Result<FileMeta, Error>
    where
        R: AsyncRead + Unpin,
    {
        let mut data = Vec::new();
        reader.take(max_bytes.saturating_add(1)).read_to_end(&mut data).await?;
        if data.len() as u64 > max_bytes {
            return Err(Error::AttachmentTooLarge { limit: max_bytes });
        }

        let mime_type = if mime_type.trim().is_empty() { DEFAULT_MIME_TYPE } else { mime_type.trim() };
        let meta = FileMeta {
            file_id: file_id.to_string(),
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            length: data.len() as u64,
            sha256: sha256_hex(&data),
            uploaded_at: Utc::now(),
        };

        let row = meta.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO files (file_id, file_name, mime_type, length, sha256, uploaded_at, data)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        row.file_id,
                        row.file_name,
                        row.mime_type,
                        row.length as i64,
                        row.sha256,
                        format_timestamp(&row.uploaded_at),
                        data,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(file_id = %meta.file_id, length = meta.length, "stored attachment blob");
        Ok(meta)
    }

    /// Delete the blob stored under `file_id`.
    ///
    /// Never fails: returns false when nothing was deleted, whether because
    /// the blob was absent or because the store reported an error. Callers
    /// treat false as "deletion not confirmed".
    pub async fn delete_file(&self, file_id: &str) -> bool {
        let id = file_id.to_string();
        let result = self
            .conn
            .call(move |conn| conn.execute("DELETE FROM files WHERE file_id = ?1", params![id]))
            .await;

        match result {
            Ok(deleted) => deleted > 0,
            Err(e) => {
                tracing::warn!(file_id, error = %e, "attachment blob delete failed");
                false
            }
        }
    }

    /// Metadata for the blob under `file_id`, if present.
    pub async fn find_file_meta(&self, file_id: &str) -> Result<Option<FileMeta>, Error> {
        let id = file_id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<FileMeta>, Error> {
                let meta = conn
                    .query_row(&format!("SELECT {META_COLUMNS} FROM files WHERE file_id = ?1"), params![id], row_to_meta)
                    .optional()?;
                Ok(meta)
            })
            .await
            .map_err(Error::from)
    }

    /// Metadata and bytes for the blob under `file_id`, if present.
    ///
    /// Fails with `CorruptBlob` when the bytes no longer match the digest
    /// recorded at upload.
    pub async fn download_file(&self, file_id: &str) -> Result<Option<(FileMeta, Vec<u8>)>, Error> {
        let id = file_id.to_string();
        let found = self
            .conn
            .call(move |conn| -> Result<Option<(FileMeta, Vec<u8>)>, Error> {
                let found = conn
                    .query_row(
                        &format!("SELECT {META_COLUMNS}, data FROM files WHERE file_id = ?1"),
                        params![id],
                        |row| Ok((row_to_meta(row)?, row.get::<_, Vec<u8>>(6)?)),
                    )
                    .optional()?;
                Ok(found)
            })
            .await
            .map_err(Error::from)?;

        match found {
            Some((meta, data)) if sha256_hex(&data) != meta.sha256 => Err(Error::CorruptBlob(meta.file_id)),
            other => Ok(other),
        }
    }

    /// Metadata of every stored blob, oldest upload first.
    pub async fn list_file_meta(&self) -> Result<Vec<FileMeta>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<FileMeta>, Error> {
                let mut stmt = conn.prepare(&format!("SELECT {META_COLUMNS} FROM files ORDER BY uploaded_at"))?;
                let files = stmt
                    .query_map([], row_to_meta)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(files)
            })
            .await
            .map_err(Error::from)
    }
}
