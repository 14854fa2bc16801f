//! Structured errors raised by the tool layer itself.
//!
//! Storage failures arrive as `leafwiki_core::Error` and convert on their
//! own; these cover request decoding and response encoding.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Errors raised while decoding tool parameters or encoding results.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid input parameters (e.g., malformed base64).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No page has the requested name.
    #[error("PAGE_NOT_FOUND: {0}")]
    UnknownPage(String),

    /// No blob has the requested file id.
    #[error("ATTACHMENT_NOT_FOUND: {0}")]
    UnknownAttachment(String),

    /// Tool output could not be serialized.
    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let code = match &err {
            ToolError::InvalidInput(_) => -32602,
            ToolError::UnknownPage(_) => -32001,
            ToolError::UnknownAttachment(_) => -32003,
            ToolError::Serialize(_) => -32000,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
