//! Unified error types for leafwiki.
//!
//! Every variant renders as `CODE: detail`. Codes fall into three groups:
//! not-found (`PAGE_NOT_FOUND`, `ATTACHMENT_NOT_FOUND`), validation
//! (`INVALID_INPUT`, `HOME_PAGE_PROTECTED`, `ATTACHMENT_TOO_LARGE`) and
//! storage failures (everything else).

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error type for the wiki storage engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller-supplied input was rejected (e.g., a name that normalizes to nothing).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No page with the given id exists.
    #[error("PAGE_NOT_FOUND: {0}")]
    PageNotFound(i64),

    /// The page has no attachment with the given file id.
    #[error("ATTACHMENT_NOT_FOUND: {file_id} on page {page_id}")]
    AttachmentNotFound { page_id: i64, file_id: String },

    /// Attempted to delete the configured home page.
    #[error("HOME_PAGE_PROTECTED: {0}")]
    HomePageProtected(String),

    /// Upload exceeded the configured attachment size limit.
    #[error("ATTACHMENT_TOO_LARGE: limit is {limit} bytes")]
    AttachmentTooLarge { limit: u64 },

    /// The blob store could not confirm a deletion.
    #[error("BLOB_DELETE_FAILED: {0}")]
    BlobDeleteFailed(String),

    /// Stored bytes no longer match their recorded digest.
    #[error("CORRUPT_BLOB: {0}")]
    CorruptBlob(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Attachment list or record (de)serialization failed.
    #[error("STORE_ERROR: serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading an upload stream failed.
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for precondition failures that callers log as warnings rather than errors.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::HomePageProtected(_) | Error::AttachmentTooLarge { .. }
        )
    }

    /// True when the operation failed because its target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PageNotFound(_) | Error::AttachmentNotFound { .. })
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::PageNotFound(_) => -32001,
            Error::AttachmentNotFound { .. } => -32003,
            Error::HomePageProtected(_) => -32004,
            Error::AttachmentTooLarge { .. } => -32005,
            Error::BlobDeleteFailed(_) => -32006,
            Error::CorruptBlob(_) => -32007,
            Error::Io(_) => -32008,
            Error::Database(_) | Error::MigrationFailed(_) | Error::Serialization(_) => -32002,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AttachmentNotFound { page_id: 5, file_id: "abc123".to_string() };
        assert!(err.to_string().contains("ATTACHMENT_NOT_FOUND"));
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::PageNotFound(42);
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);
        assert!(mcp_err.message.contains("42"));
    }

    #[test]
    fn test_error_categories() {
        assert!(Error::HomePageProtected("home".into()).is_validation());
        assert!(Error::AttachmentTooLarge { limit: 1 }.is_validation());
        assert!(!Error::BlobDeleteFailed("x".into()).is_validation());
        assert!(Error::PageNotFound(1).is_not_found());
        assert!(!Error::CorruptBlob("x".into()).is_not_found());
    }
}
