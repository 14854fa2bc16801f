//! Storage and caching engine for leafwiki.
//!
//! This crate provides:
//! - Page, attachment blob and change-log storage on SQLite
//! - A time-bounded cache for the full page listing
//! - Page name normalization and substring search
//! - Unified error types and layered configuration
//!
//! Callers work through [`Wiki`]; rendering, routing and request parsing
//! live outside this crate.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod slug;
pub mod store;
pub mod wiki;

pub use cache::PageListCache;
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{Attachment, AttachmentUpload, ChangeRecord, FileMeta, Page, PageInput};
pub use store::WikiDb;
pub use wiki::Wiki;
