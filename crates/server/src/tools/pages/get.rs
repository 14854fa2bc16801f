//! wiki_get_page tool implementation.
//!
//! Looks a page up by name, ignoring case.

use leafwiki_core::Wiki;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tools::{json_result, store_failure};

/// Parameters for the wiki_get_page tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetPageParams {
    /// Page name (slug). Case does not matter.
    pub name: String,
}

/// Implementation of the wiki_get_page tool.
pub async fn get_impl(wiki: &Wiki, params: GetPageParams) -> Result<CallToolResult, McpError> {
    let page = wiki
        .get_page(&params.name)
        .await
        .map_err(|e| store_failure("wiki_get_page", e))?
        .ok_or_else(|| ToolError::UnknownPage(params.name.clone()))?;

    json_result(&page)
}
