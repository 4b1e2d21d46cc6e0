//! Process-wide panic capture.

use std::panic::{self, PanicHookInfo};
use std::sync::Arc;

use kb_core::enums::LogLevel;
use serde_json::json;

use crate::SystemLogger;
use crate::categories;

/// Log every panic under `GLOBAL_ERROR`, then defer to the previously
/// installed hook. Purely observational: unwinding proceeds as usual.
pub fn install_panic_hook(logger: Arc<SystemLogger>) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let entry = logger.build_entry(
            LogLevel::Error,
            categories::GLOBAL_ERROR,
            panic_message(info),
            Some(json!({
                "location": info.location().map(ToString::to_string),
                "thread": std::thread::current().name().map(str::to_string),
            })),
            None,
        );
        if !logger.try_append_entry(entry) {
            tracing::error!("panic not recorded: log buffer busy");
        }
        previous(info);
    }));
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with non-string payload".to_string())
}
