//! wiki_delete_attachment tool implementation.

use leafwiki_core::Wiki;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::{json_result, store_failure};

/// Parameters for the wiki_delete_attachment tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteAttachmentParams {
    /// Id of the page that lists the attachment.
    pub page_id: i64,

    /// File id of the attachment, compared ignoring case.
    pub file_id: String,
}

/// Implementation of the wiki_delete_attachment tool.
///
/// Returns the page as it reads after the removal.
pub async fn delete_impl(wiki: &Wiki, params: DeleteAttachmentParams) -> Result<CallToolResult, McpError> {
    let page = wiki
        .delete_attachment(params.page_id, &params.file_id)
        .await
        .map_err(|e| store_failure("wiki_delete_attachment", e))?;

    json_result(&page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{output, wiki};
    use leafwiki_core::{AttachmentUpload, Page, PageInput};

    #[tokio::test]
    async fn test_delete_attachment() {
        let wiki = wiki().await;
        let page = wiki
            .save_page(PageInput {
                name: "gallery".into(),
                attachment: Some(AttachmentUpload {
                    file_name: "cat.jpg".into(),
                    mime_type: "image/jpeg".into(),
                    data: vec![0xff, 0xd8, 0xff],
                }),
                ..Default::default()
            })
            .await
            .unwrap();
        let file_id = page.attachments[0].file_id.clone();

        let params = DeleteAttachmentParams { page_id: page.id, file_id: file_id.to_uppercase() };
        let updated: Page = output(&delete_impl(&wiki, params).await.unwrap());

        assert!(updated.attachments.is_empty());
        assert!(wiki.download_attachment(&file_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_attachment_not_listed() {
        let wiki = wiki().await;
        let page = wiki.save_page(PageInput { name: "plain".into(), ..Default::default() }).await.unwrap();

        let params = DeleteAttachmentParams { page_id: page.id, file_id: "missing".into() };
        let err = delete_impl(&wiki, params).await.unwrap_err();
        assert_eq!(err.code.0, -32003);
    }
}
