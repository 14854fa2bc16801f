//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use leafwiki_core::Wiki;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::attachments::{self, DeleteAttachmentParams, GetAttachmentParams, SweepParams};
use crate::tools::history::history_impl;
use crate::tools::pages::{self, DeletePageParams, GetPageParams, SavePageParams, SearchParams};

/// The main MCP server handler for leafwiki.
#[derive(Clone)]
pub struct WikiServer {
    wiki: Arc<Wiki>,
    home_page_name: String,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl WikiServer {
    /// Create a new server handler over `wiki`.
    ///
    /// `home_page_name` names the page that `wiki_delete_page` refuses to delete.
    pub fn new(wiki: Arc<Wiki>, home_page_name: impl Into<String>) -> Self {
        Self { wiki, home_page_name: home_page_name.into(), tool_router: Self::tool_router() }
    }

    #[tool(description = "List every wiki page (id, name, last modified, attachment count), sorted by name.")]
    async fn wiki_list_pages(&self) -> Result<CallToolResult, McpError> {
        pages::list_impl(&self.wiki).await
    }

    #[tool(description = "Get a wiki page by name, ignoring case. Returns content and attachment list.")]
    async fn wiki_get_page(&self, params: Parameters<GetPageParams>) -> Result<CallToolResult, McpError> {
        pages::get_impl(&self.wiki, params.0).await
    }

    /// Create or replace a page.
    ///
    /// Omitting `id` creates a page; the name is normalized to a kebab-case slug either way.
    #[tool(
        description = "Create a wiki page (no id) or replace page `id`. Name is normalized to a lowercase slug. Optionally attach one file given as base64."
    )]
    async fn wiki_save_page(&self, params: Parameters<SavePageParams>) -> Result<CallToolResult, McpError> {
        pages::save_impl(&self.wiki, params.0).await
    }

    #[tool(description = "Delete a wiki page and its attachments by id. The home page cannot be deleted.")]
    async fn wiki_delete_page(&self, params: Parameters<DeletePageParams>) -> Result<CallToolResult, McpError> {
        pages::delete_impl(&self.wiki, &self.home_page_name, params.0).await
    }

    #[tool(description = "Search page names and content for a term, ignoring case. A blank term matches nothing.")]
    async fn wiki_search(&self, params: Parameters<SearchParams>) -> Result<CallToolResult, McpError> {
        pages::search_impl(&self.wiki, params.0).await
    }

    #[tool(description = "Download an attachment by file id. Returns metadata and the bytes as base64.")]
    async fn wiki_get_attachment(&self, params: Parameters<GetAttachmentParams>) -> Result<CallToolResult, McpError> {
        attachments::get_impl(&self.wiki, params.0).await
    }

    #[tool(description = "Remove one attachment from a page, deleting its stored file. Returns the updated page.")]
    async fn wiki_delete_attachment(
        &self, params: Parameters<DeleteAttachmentParams>,
    ) -> Result<CallToolResult, McpError> {
        attachments::delete_impl(&self.wiki, params.0).await
    }

    #[tool(description = "Delete stored files that no page references and that are older than the grace period.")]
    async fn wiki_sweep_orphans(&self, params: Parameters<SweepParams>) -> Result<CallToolResult, McpError> {
        attachments::sweep_impl(&self.wiki, params.0).await
    }

    #[tool(description = "Return the wiki change log, oldest first.")]
    async fn wiki_history(&self) -> Result<CallToolResult, McpError> {
        history_impl(&self.wiki).await
    }
}

impl ServerHandler for WikiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "leafwiki".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::wiki;

    #[tokio::test]
    async fn test_router_lists_every_tool() {
        let server = WikiServer::new(wiki().await, "home");

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "wiki_delete_attachment",
                "wiki_delete_page",
                "wiki_get_attachment",
                "wiki_get_page",
                "wiki_history",
                "wiki_list_pages",
                "wiki_save_page",
                "wiki_search",
                "wiki_sweep_orphans",
            ]
        );
    }

    #[tokio::test]
    async fn test_server_info() {
        let server = WikiServer::new(wiki().await, "home");
        assert_eq!(server.get_info().server_info.name, "leafwiki");
    }
}
