//! System logger and console sink settings.

use serde::{Deserialize, Serialize};

/// Default ring buffer capacity.
const fn default_max_entries() -> usize {
    1000
}

fn default_console_level() -> String {
    String::from("warn")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Maximum number of entries kept in memory and in the persisted snapshot.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Default `tracing` filter for the console when `KANBAN_LOG` is unset.
    #[serde(default = "default_console_level")]
    pub console_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            console_level: default_console_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = LoggingConfig::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.console_level, "warn");
    }
}
