//! MCP tool implementations.
//!
//! Each tool is a thin adapter: it decodes parameters, calls one `Wiki`
//! operation and returns the result as pretty-printed JSON text.

pub mod attachments;
pub mod history;
pub mod pages;

use leafwiki_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::ToolError;

/// Serialize `output` as the tool's text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(ToolError::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Log a failed wiki operation and convert it for the client.
///
/// Precondition failures are logged as warnings, storage failures as errors.
pub(crate) fn store_failure(tool: &'static str, err: Error) -> McpError {
    if err.is_validation() || err.is_not_found() {
        tracing::warn!(tool, error = %err, "wiki operation rejected");
    } else {
        tracing::error!(tool, error = %err, "wiki operation failed");
    }
    err.into()
}
