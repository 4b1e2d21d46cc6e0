use kb_config::KanbanConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &KanbanConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &KanbanConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.notify.is_configured() && has_env_prefix(&env_keys, "KANBAN_NOTIFY") {
        warnings.push(
            "Notify config appears default while KANBAN_NOTIFY* env vars exist. Use double underscores (example: KANBAN_NOTIFY__BOT_TOKEN)."
                .to_string(),
        );
    }

    if config.storage.data_dir == kb_config::StorageConfig::default().data_dir
        && has_env_prefix(&env_keys, "KANBAN_STORAGE")
    {
        warnings.push(
            "Storage config appears default while KANBAN_STORAGE* env vars exist. Use double underscores (example: KANBAN_STORAGE__DATA_DIR)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use kb_config::{KanbanConfig, NotifyConfig};

    use super::collect_unconfigured_warnings;

    fn env(keys: &[&str]) -> Vec<(String, String)> {
        keys.iter().map(|k| ((*k).to_string(), "x".to_string())).collect()
    }

    #[test]
    fn single_underscore_notify_key_warns() {
        let warnings =
            collect_unconfigured_warnings(&KanbanConfig::default(), env(&["KANBAN_NOTIFY_BOT_TOKEN"]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("KANBAN_NOTIFY__BOT_TOKEN"));
    }

    #[test]
    fn configured_notify_is_quiet() {
        let config = KanbanConfig {
            notify: NotifyConfig {
                bot_token: "t".into(),
                chat_id: "c".into(),
                ..NotifyConfig::default()
            },
            ..KanbanConfig::default()
        };
        let warnings = collect_unconfigured_warnings(&config, env(&["KANBAN_NOTIFY__BOT_TOKEN"]));
        assert!(warnings.is_empty());
    }

    #[test]
    fn unrelated_env_is_quiet() {
        let warnings = collect_unconfigured_warnings(&KanbanConfig::default(), env(&["HOME", "PATH"]));
        assert!(warnings.is_empty());
    }
}
