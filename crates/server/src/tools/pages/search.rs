//! wiki_search tool implementation.

use leafwiki_core::Wiki;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{PageSummary, sorted_summaries};
use crate::tools::{json_result, store_failure};

/// Parameters for the wiki_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Text to look for in page names and content, ignoring case.
    pub term: String,
}

/// Output from the wiki_search tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutput {
    pub term: String,
    pub matches: Vec<PageSummary>,
}

/// Implementation of the wiki_search tool.
pub async fn search_impl(wiki: &Wiki, params: SearchParams) -> Result<CallToolResult, McpError> {
    let pages = wiki
        .search(&params.term)
        .await
        .map_err(|e| store_failure("wiki_search", e))?;

    json_result(&SearchOutput { term: params.term, matches: sorted_summaries(&pages) })
}
