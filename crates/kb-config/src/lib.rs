//! # kb-config
//!
//! Layered configuration loading for the kanban board using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KANBAN_*` prefix, `__` as separator)
//! 2. Project-level `.kanban/config.toml`
//! 3. User-level `~/.config/kanban/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KANBAN_NOTIFY__BOT_TOKEN` -> `notify.bot_token`,
//! `KANBAN_STORAGE__DATA_DIR` -> `storage.data_dir`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use kb_config::KanbanConfig;
//!
//! let config = KanbanConfig::load_with_dotenv().expect("config");
//! if config.notify.is_configured() {
//!     println!("notifications go to chat {}", config.notify.chat_id);
//! }
//! ```

mod error;
mod logging;
mod notify;
mod storage;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use notify::NotifyConfig;
pub use storage::{IN_MEMORY, StorageConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KanbanConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KanbanConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".kanban/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("KANBAN_").split("__"))
    }

    /// Reject values that would break the logger or notifier at runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "logging.max_entries".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.notify.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notify.timeout_secs".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.data_dir".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kanban").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = KanbanConfig::default();
        assert!(!config.notify.is_configured());
        assert_eq!(config.logging.max_entries, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn figment_builds_without_files() {
        let config: KanbanConfig = KanbanConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.notify.timeout_secs, 5);
        assert_eq!(config.storage.data_dir, ".kanban/data");
    }

    #[test]
    fn zero_capacity_rejected() {
        let mut config = KanbanConfig::default();
        config.logging.max_entries = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "logging.max_entries"
        ));
    }
}
