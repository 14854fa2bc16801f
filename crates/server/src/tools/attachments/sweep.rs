//! wiki_sweep_orphans tool implementation.
//!
//! Reclaims blobs left behind by saves whose page write failed.

use leafwiki_core::Wiki;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tools::{json_result, store_failure};

const DEFAULT_GRACE_SECS: i64 = 3600;

fn default_grace_secs() -> i64 {
    DEFAULT_GRACE_SECS
}

/// Parameters for the wiki_sweep_orphans tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SweepParams {
    /// Only blobs uploaded at least this many seconds ago are swept.
    #[serde(default = "default_grace_secs")]
    pub grace_secs: i64,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self { grace_secs: DEFAULT_GRACE_SECS }
    }
}

/// Output from the wiki_sweep_orphans tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutput {
    pub deleted: u64,
}

/// Implementation of the wiki_sweep_orphans tool.
pub async fn sweep_impl(wiki: &Wiki, params: SweepParams) -> Result<CallToolResult, McpError> {
    if params.grace_secs < 0 {
        return Err(ToolError::InvalidInput(format!("grace_secs must not be negative, got {}", params.grace_secs)).into());
    }
    let grace = chrono::Duration::try_seconds(params.grace_secs)
        .ok_or_else(|| ToolError::InvalidInput(format!("grace_secs {} is out of range", params.grace_secs)))?;

    let deleted = wiki
        .sweep_orphaned_files(grace)
        .await
        .map_err(|e| store_failure("wiki_sweep_orphans", e))?;

    json_result(&SweepOutput { deleted })
}
