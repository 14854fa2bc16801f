//! Attachment tools: download, delete and the orphan sweep.

pub mod delete;
pub mod get;
pub mod sweep;

pub use delete::{DeleteAttachmentParams, delete_impl};
pub use get::{GetAttachmentParams, get_impl};
pub use sweep::{SweepParams, sweep_impl};
