//! SQLite-backed storage for pages, attachment blobs and the change log.
//!
//! All access goes through [`WikiDb`], a handle over a tokio-rusqlite
//! connection. It supports:
//!
//! - Page rows with an embedded attachment list
//! - A blob table addressed by generated file id
//! - An append-only change log written in the same transaction as each page write
//! - Automatic schema migrations and WAL mode

pub mod connection;
pub mod files;
pub mod history;
pub mod migrations;
pub mod pages;

pub use connection::WikiDb;

use chrono::{DateTime, Utc};
use tokio_rusqlite::rusqlite;

/// Timestamps are stored as RFC 3339 text.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_roundtrip_is_exact() {
        let now = Utc::now();
        assert_eq!(parse_timestamp(0, &format_timestamp(&now)).unwrap(), now);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp(2, "yesterday").is_err());
    }
}
