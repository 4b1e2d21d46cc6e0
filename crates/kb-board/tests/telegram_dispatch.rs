//! Mutations dispatching through the real Telegram notifier.

use std::sync::Arc;
use std::time::Duration;

use kb_board::{BoardService, EntryPoint, NewRequest};
use kb_config::NotifyConfig;
use kb_core::actor::Actor;
use kb_core::enums::{LogLevel, RequestStatus};
use kb_log::{ExportFormat, LogFilter, SystemLogger, categories};
use kb_notify::TelegramNotifier;
use kb_store::RecordStore;
use pretty_assertions::assert_eq;

fn board(config: NotifyConfig) -> BoardService {
    let store = RecordStore::in_memory();
    let logger = Arc::new(SystemLogger::new(store.clone(), 1000));
    let notifier = Arc::new(TelegramNotifier::new(config).unwrap());
    BoardService::new(store, logger, notifier)
}

fn notify_logs(svc: &BoardService) -> Vec<kb_core::entities::LogEntry> {
    svc.logger()
        .get_logs(&LogFilter::default().category(categories::NOTIFY))
}

#[tokio::test]
async fn unconfigured_bot_logs_disabled_and_mutation_succeeds() {
    let svc = board(NotifyConfig::default());
    let created = svc
        .create_request(
            NewRequest::new("Email setup", "configure account"),
            EntryPoint::Public,
            &Actor::system(),
        )
        .unwrap();
    assert_eq!(created.request.status, RequestStatus::Uncategorized);
    assert_eq!(svc.pending_notifications(), 0);

    let logs = notify_logs(&svc);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].message, "Notification disabled");
}

#[tokio::test]
async fn api_rejection_is_logged_not_raised() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let api = std::thread::spawn(move || {
        if let Ok(Some(request)) = server.recv_timeout(Duration::from_secs(5)) {
            let response = tiny_http::Response::from_string(r#"{"ok":false}"#)
                .with_status_code(401);
            let _ = request.respond(response);
        }
    });

    let svc = board(NotifyConfig {
        bot_token: "123:abc".into(),
        chat_id: "-1001".into(),
        api_base: format!("http://127.0.0.1:{port}"),
        timeout_secs: 2,
    });
    let actor = Actor::system();
    let created = svc
        .create_request(NewRequest::new("Router", "down"), EntryPoint::Dashboard, &actor)
        .unwrap();
    assert!(svc.get_request(&created.request.id).unwrap().is_some());

    assert_eq!(svc.flush_notifications().await, 1);
    api.join().unwrap();

    let logs = notify_logs(&svc);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].level, LogLevel::Warn);
    assert_eq!(logs[0].message, "Notification failed");
    let details = logs[0].details.as_ref().unwrap();
    assert_eq!(details["protocol"], created.protocol.as_str());
    assert_eq!(details["outcome"], "failed");
}

#[tokio::test]
async fn transport_failure_keeps_token_out_of_logs() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let svc = board(NotifyConfig {
        bot_token: "777:hidden".into(),
        chat_id: "-1001".into(),
        api_base: format!("http://127.0.0.1:{port}"),
        timeout_secs: 1,
    });
    svc.create_request(
        NewRequest::new("Router", "down"),
        EntryPoint::Dashboard,
        &Actor::system(),
    )
    .unwrap();
    assert_eq!(svc.flush_notifications().await, 1);

    let logs = notify_logs(&svc);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].message, "Notification failed");
    let exported = svc.logger().export_logs(ExportFormat::Json).unwrap();
    assert!(!exported.contains("777:hidden"), "{exported}");
}
