//! wiki_get_attachment tool implementation.
//!
//! Returns the blob's metadata and its bytes as standard base64.

use base64::{Engine, engine::general_purpose::STANDARD};
use leafwiki_core::{FileMeta, Wiki};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tools::{json_result, store_failure};

/// Parameters for the wiki_get_attachment tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetAttachmentParams {
    /// File id as listed in a page's attachments.
    pub file_id: String,
}

/// Output from the wiki_get_attachment tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAttachmentOutput {
    #[serde(flatten)]
    pub meta: FileMeta,
    pub data_base64: String,
}

/// Implementation of the wiki_get_attachment tool.
pub async fn get_impl(wiki: &Wiki, params: GetAttachmentParams) -> Result<CallToolResult, McpError> {
    let (meta, data) = wiki
        .download_attachment(&params.file_id)
        .await
        .map_err(|e| store_failure("wiki_get_attachment", e))?
        .ok_or_else(|| ToolError::UnknownAttachment(params.file_id.clone()))?;

    json_result(&GetAttachmentOutput { meta, data_base64: STANDARD.encode(data) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{output, wiki};
    use leafwiki_core::{AttachmentUpload, PageInput};

    #[tokio::test]
    async fn test_get_attachment() {
        let wiki = wiki().await;
        let page = wiki
            .save_page(PageInput {
                name: "docs".into(),
                attachment: Some(AttachmentUpload {
                    file_name: "notes.txt".into(),
                    mime_type: "text/plain".into(),
                    data: b"hello".to_vec(),
                }),
                ..Default::default()
            })
            .await
            .unwrap();
        let file_id = page.attachments[0].file_id.clone();

        let result = get_impl(&wiki, GetAttachmentParams { file_id: file_id.clone() }).await.unwrap();
        let out: GetAttachmentOutput = output(&result);
        assert_eq!(out.meta.file_id, file_id);
        assert_eq!(out.meta.file_name, "notes.txt");
        assert_eq!(STANDARD.decode(out.data_base64).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_get_attachment_missing() {
        let wiki = wiki().await;
        let err = get_impl(&wiki, GetAttachmentParams { file_id: "nope".into() }).await.unwrap_err();
        assert_eq!(err.code.0, -32003);
    }
}
