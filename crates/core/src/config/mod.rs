//! Application configuration with layered loading.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. TOML config file (if LEAFWIKI_CONFIG_FILE set)
//! 3. Environment variables (LEAFWIKI_*)

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite wiki database.
    ///
    /// Set via LEAFWIKI_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Name of the page that can never be deleted.
    ///
    /// Set via LEAFWIKI_HOME_PAGE_NAME environment variable. Must already be
    /// a normalized page name.
    #[serde(default = "default_home_page_name")]
    pub home_page_name: String,

    /// Lifetime of the cached page listing, in seconds.
    ///
    /// Set via LEAFWIKI_PAGE_LIST_TTL_SECS environment variable.
    #[serde(default = "default_page_list_ttl_secs")]
    pub page_list_ttl_secs: u64,

    /// Largest accepted attachment upload, in bytes.
    ///
    /// Set via LEAFWIKI_MAX_ATTACHMENT_BYTES environment variable.
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./leafwiki.sqlite")
}

fn default_home_page_name() -> String {
    "home".into()
}

fn default_page_list_ttl_secs() -> u64 {
    30 * 60
}

fn default_max_attachment_bytes() -> u64 {
    10 * 1024 * 1024 // 10MB
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            home_page_name: default_home_page_name(),
            page_list_ttl_secs: default_page_list_ttl_secs(),
            max_attachment_bytes: default_max_attachment_bytes(),
        }
    }
}

impl AppConfig {
    /// Page listing TTL as a Duration.
    pub fn page_list_ttl(&self) -> Duration {
        Duration::from_secs(self.page_list_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LEAFWIKI_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LEAFWIKI_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
