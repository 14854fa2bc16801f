//! wiki_save_page tool implementation.
//!
//! Creates a page when `id` is absent and replaces page `id` otherwise. An
//! optional attachment travels base64-encoded and is appended to the page.

use base64::{Engine, engine::general_purpose::STANDARD};
use leafwiki_core::{AttachmentUpload, PageInput, Wiki};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tools::{json_result, store_failure};

/// Parameters for the wiki_save_page tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SavePageParams {
    /// Id of the page to replace. Omit to create a new page.
    #[serde(default)]
    pub id: Option<i64>,

    /// Page name; normalized to a lowercase kebab-case slug before storing.
    pub name: String,

    /// Markdown content, stored as given.
    #[serde(default)]
    pub content: String,

    /// File to attach to the page.
    #[serde(default)]
    pub attachment: Option<AttachmentParams>,
}

/// An attachment carried inline with a save.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AttachmentParams {
    pub file_name: String,

    /// MIME type; defaults to application/octet-stream.
    #[serde(default)]
    pub mime_type: String,

    /// File bytes, standard base64 with padding.
    pub data_base64: String,
}

impl AttachmentParams {
    fn decode(self) -> Result<AttachmentUpload, ToolError> {
        let data = STANDARD
            .decode(self.data_base64.trim())
            .map_err(|e| ToolError::InvalidInput(format!("attachment data is not valid base64: {e}")))?;
        Ok(AttachmentUpload { file_name: self.file_name, mime_type: self.mime_type, data })
    }
}

/// Implementation of the wiki_save_page tool.
pub async fn save_impl(wiki: &Wiki, params: SavePageParams) -> Result<CallToolResult, McpError> {
    let attachment = params.attachment.map(AttachmentParams::decode).transpose()?;
    let input = PageInput { id: params.id, name: params.name, content: params.content, attachment };

    let page = wiki
        .save_page(input)
        .await
        .map_err(|e| store_failure("wiki_save_page", e))?;

    json_result(&page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{output, wiki};
    use leafwiki_core::Page;

    fn params(id: Option<i64>, name: &str, content: &str) -> SavePageParams {
        SavePageParams { id, name: name.into(), content: content.into(), attachment: None }
    }

    #[tokio::test]
    async fn test_save_creates_then_replaces() {
        let wiki = wiki().await;

        let created: Page = output(&save_impl(&wiki, params(None, "Release Notes", "v1")).await.unwrap());
        assert_eq!(created.name, "release-notes");

        let updated: Page = output(&save_impl(&wiki, params(Some(created.id), "Release Notes", "v2")).await.unwrap());
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.content, "v2");
        assert_eq!(wiki.list_all_pages().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_with_attachment() {
        let wiki = wiki().await;
        let mut request = params(None, "Diagrams", "");
        request.attachment = Some(AttachmentParams {
            file_name: "flow.svg".into(),
            mime_type: "image/svg+xml".into(),
            data_base64: STANDARD.encode(b"<svg/>"),
        });

        let page: Page = output(&save_impl(&wiki, request).await.unwrap());
        assert_eq!(page.attachments.len(), 1);

        let (meta, data) = wiki.download_attachment(&page.attachments[0].file_id).await.unwrap().unwrap();
        assert_eq!(data, b"<svg/>");
        assert_eq!(meta.mime_type, "image/svg+xml");
    }

    #[tokio::test]
    async fn test_save_rejects_bad_base64() {
        let wiki = wiki().await;
        let mut request = params(None, "Broken", "");
        request.attachment = Some(AttachmentParams {
            file_name: "x.bin".into(),
            mime_type: String::new(),
            data_base64: "not base64!!".into(),
        });

        let err = save_impl(&wiki, request).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert!(wiki.list_all_pages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_unknown_id() {
        let wiki = wiki().await;
        let err = save_impl(&wiki, params(Some(404), "ghost", "")).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_save_empty_name() {
        let wiki = wiki().await;
        let err = save_impl(&wiki, params(None, "<b></b>", "")).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
