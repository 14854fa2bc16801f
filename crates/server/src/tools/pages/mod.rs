//! Page tools: listing, lookup, save, delete and search.

pub mod delete;
pub mod get;
pub mod list;
pub mod save;
pub mod search;

use chrono::{DateTime, Utc};
use leafwiki_core::Page;
use serde::{Deserialize, Serialize};

pub use delete::{DeletePageParams, delete_impl};
pub use get::{GetPageParams, get_impl};
pub use list::list_impl;
pub use save::{SavePageParams, save_impl};
pub use search::{SearchParams, search_impl};

/// Listing row: a page without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: i64,
    pub name: String,
    pub last_modified_utc: DateTime<Utc>,
    pub attachment_count: usize,
}

impl From<&Page> for PageSummary {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id,
            name: page.name.clone(),
            last_modified_utc: page.last_modified_utc,
            attachment_count: page.attachments.len(),
        }
    }
}

/// Summaries sorted by name; the store returns pages unordered.
pub(crate) fn sorted_summaries<'a>(pages: impl IntoIterator<Item = &'a Page>) -> Vec<PageSummary> {
    let mut summaries: Vec<PageSummary> = pages.into_iter().map(PageSummary::from).collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    summaries
}
