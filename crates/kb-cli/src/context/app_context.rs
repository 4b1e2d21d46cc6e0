use std::sync::Arc;

use anyhow::Context;
use kb_board::{BoardService, SessionManager};
use kb_config::KanbanConfig;
use kb_core::actor::Actor;
use kb_core::entities::{LogOrigin, User};
use kb_log::{SystemLogger, install_panic_hook};
use kb_notify::TelegramNotifier;
use kb_store::RecordStore;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: KanbanConfig,
    pub logger: Arc<SystemLogger>,
    pub board: Arc<BoardService>,
    pub session: SessionManager,
}

impl AppContext {
    /// Open the store, seed it on first run, wire the logger, notifier and
    /// board, and resume any persisted session.
    pub fn init(config: KanbanConfig) -> anyhow::Result<Self> {
        let store = if config.storage.is_in_memory() {
            RecordStore::in_memory()
        } else {
            RecordStore::open_dir(&config.storage.data_dir).with_context(|| {
                format!("failed to open data directory {}", config.storage.data_dir)
            })?
        };

        let seeded = store.seed_defaults().context("failed to seed default data")?;
        if !seeded.is_empty() {
            tracing::info!(collections = ?seeded.seeded, "first run: default data written");
        }

        let logger = Arc::new(
            SystemLogger::new(store.clone(), config.logging.max_entries).with_origin(LogOrigin {
                ip: None,
                agent: Some(format!("kb/{}", env!("CARGO_PKG_VERSION"))),
            }),
        );
        install_panic_hook(Arc::clone(&logger));

        let notifier = TelegramNotifier::new(config.notify.clone())
            .context("failed to build notification client")?;
        if !notifier.is_configured() {
            tracing::debug!("notifications disabled: bot token or chat id missing");
        }

        let board = Arc::new(BoardService::new(
            store,
            Arc::clone(&logger),
            Arc::new(notifier),
        ));
        let session = SessionManager::new(Arc::clone(&board));
        session.restore().context("failed to restore session")?;

        Ok(Self {
            config,
            logger,
            board,
            session,
        })
    }

    /// The logged-in user, or an error telling how to log in.
    pub fn require_user(&self) -> anyhow::Result<User> {
        self.session
            .current()
            .context("not logged in. Run 'kb login <login> --password <password>' first.")
    }

    /// The logged-in user, who must be an administrator.
    pub fn require_admin(&self) -> anyhow::Result<User> {
        let user = self.require_user()?;
        if !user.is_admin() {
            anyhow::bail!("'{}' is not an administrator", user.login);
        }
        Ok(user)
    }

    pub fn actor(&self) -> Actor {
        self.session.actor()
    }
}
