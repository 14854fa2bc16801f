//! wiki_delete_page tool implementation.

use leafwiki_core::Wiki;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::{json_result, store_failure};

/// Parameters for the wiki_delete_page tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeletePageParams {
    /// Id of the page to delete.
    pub id: i64,
}

/// Output from the wiki_delete_page tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePageOutput {
    pub deleted_id: i64,
}

/// Implementation of the wiki_delete_page tool.
///
/// The page named `home_page_name` cannot be deleted.
pub async fn delete_impl(
    wiki: &Wiki, home_page_name: &str, params: DeletePageParams,
) -> Result<CallToolResult, McpError> {
    wiki.delete_page(params.id, home_page_name)
        .await
        .map_err(|e| store_failure("wiki_delete_page", e))?;

    json_result(&DeletePageOutput { deleted_id: params.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{output, wiki};
    use leafwiki_core::PageInput;

    #[tokio::test]
    async fn test_delete_page() {
        let wiki = wiki().await;
        let page = wiki.save_page(PageInput { name: "scratch".into(), ..Default::default() }).await.unwrap();

        let result = delete_impl(&wiki, "home", DeletePageParams { id: page.id }).await.unwrap();
        let out: DeletePageOutput = output(&result);
        assert_eq!(out.deleted_id, page.id);
        assert!(wiki.get_page("scratch").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_home_refused() {
        let wiki = wiki().await;
        let home = wiki.save_page(PageInput { name: "Home".into(), ..Default::default() }).await.unwrap();

        let err = delete_impl(&wiki, "home", DeletePageParams { id: home.id }).await.unwrap_err();
        assert_eq!(err.code.0, -32004);
        assert!(wiki.get_page("home").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let wiki = wiki().await;
        let err = delete_impl(&wiki, "home", DeletePageParams { id: 7 }).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }
}
