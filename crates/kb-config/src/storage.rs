//! Record store location.

use serde::{Deserialize, Serialize};

/// Sentinel `data_dir` selecting the in-memory backend.
pub const IN_MEMORY: &str = ":memory:";

fn default_data_dir() -> String {
    String::from(".kanban/data")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding one `<collection>.json` document per collection,
    /// or `":memory:"`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.data_dir == IN_MEMORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_project_data_dir() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, ".kanban/data");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn memory_sentinel_detected() {
        let config = StorageConfig {
            data_dir: IN_MEMORY.into(),
        };
        assert!(config.is_in_memory());
    }
}
