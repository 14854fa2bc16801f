//! wiki_list_pages tool implementation.

use leafwiki_core::Wiki;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::{Deserialize, Serialize};

use super::{PageSummary, sorted_summaries};
use crate::tools::{json_result, store_failure};

/// Output from the wiki_list_pages tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPagesOutput {
    pub pages: Vec<PageSummary>,
}

/// Implementation of the wiki_list_pages tool.
pub async fn list_impl(wiki: &Wiki) -> Result<CallToolResult, McpError> {
    let pages = wiki
        .list_all_pages()
        .await
        .map_err(|e| store_failure("wiki_list_pages", e))?;

    json_result(&ListPagesOutput { pages: sorted_summaries(pages.iter()) })
}
