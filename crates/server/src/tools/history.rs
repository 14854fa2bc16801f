//! wiki_history tool implementation.

use leafwiki_core::{ChangeRecord, Wiki};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::{Deserialize, Serialize};

use crate::tools::{json_result, store_failure};

/// Output from the wiki_history tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryOutput {
    pub changes: Vec<ChangeRecord>,
}

/// Implementation of the wiki_history tool: the change log, oldest first.
pub async fn history_impl(wiki: &Wiki) -> Result<CallToolResult, McpError> {
    let changes = wiki
        .change_history()
        .await
        .map_err(|e| store_failure("wiki_history", e))?;

    json_result(&HistoryOutput { changes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{output, wiki};
    use leafwiki_core::PageInput;

    #[tokio::test]
    async fn test_history_records_mutations() {
        let wiki = wiki().await;
        let page = wiki.save_page(PageInput { name: "Log Me".into(), ..Default::default() }).await.unwrap();
        wiki.save_page(PageInput { id: Some(page.id), name: "Log Me".into(), ..Default::default() })
            .await
            .unwrap();
        wiki.delete_page(page.id, "home").await.unwrap();

        let out: HistoryOutput = output(&history_impl(&wiki).await.unwrap());
        let names: Vec<&str> = out.changes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Create Page log-me", "Edit Page log-me", "Delete Page log-me"]);
    }
}
