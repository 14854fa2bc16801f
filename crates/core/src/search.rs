//! Substring search over page names and content.
//!
//! There is no index: a search scans every page row and keeps those whose
//! name or content contains the term, ignoring case. Results come back in
//! storage order and are not ranked.

use crate::Error;
use crate::model::Page;
use crate::store::WikiDb;

/// Search the store for pages matching `term`.
///
/// A blank term matches nothing.
pub async fn search_pages(db: &WikiDb, term: &str) -> Result<Vec<Page>, Error> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let pages = db.all_pages().await?;
    let matched = filter_pages(pages, term);
    tracing::debug!(term, hits = matched.len(), "page search");
    Ok(matched)
}

/// Keep the pages whose name or content contains `term`, ignoring case.
pub fn filter_pages(pages: Vec<Page>, term: &str) -> Vec<Page> {
    let needle = term.to_lowercase();
    pages
        .into_iter()
        .filter(|page| page.name.to_lowercase().contains(&needle) || page.content.to_lowercase().contains(&needle))
        .collect()
}
