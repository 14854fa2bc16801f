//! Configuration validation rules.
//!
//! Checks applied to `AppConfig` after it has been loaded from environment,
//! files, or defaults.

use crate::config::AppConfig;
use crate::slug::normalize_page_name;
use thiserror::Error;

const MAX_TTL_SECS: u64 = 24 * 60 * 60;
const MAX_ATTACHMENT_LIMIT: u64 = 100 * 1024 * 1024;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `home_page_name` is empty or not already a normalized page name
    /// - `page_list_ttl_secs` is 0 or exceeds 24 hours
    /// - `max_attachment_bytes` is 0 or exceeds 100MB
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.home_page_name.is_empty() {
            return Err(ConfigError::Invalid { field: "home_page_name".into(), reason: "must not be empty".into() });
        }
        let normalized = normalize_page_name(&self.home_page_name);
        if normalized != self.home_page_name {
            return Err(ConfigError::Invalid {
                field: "home_page_name".into(),
                reason: format!("must be a normalized page name (did you mean \"{normalized}\"?)"),
            });
        }

        if self.page_list_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "page_list_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.page_list_ttl_secs > MAX_TTL_SECS {
            return Err(ConfigError::Invalid {
                field: "page_list_ttl_secs".into(),
                reason: "must not exceed 24 hours (86400s)".into(),
            });
        }

        if self.max_attachment_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_attachment_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_attachment_bytes > MAX_ATTACHMENT_LIMIT {
            return Err(ConfigError::Invalid {
                field: "max_attachment_bytes".into(),
                reason: "must not exceed 100MB".into(),
            });
        }

        if self.page_list_ttl_secs < 5 {
            tracing::warn!(
                ttl_secs = self.page_list_ttl_secs,
                "page listing cache TTL is very short; most listings will hit the database"
            );
        }

        Ok(())
    }
}
