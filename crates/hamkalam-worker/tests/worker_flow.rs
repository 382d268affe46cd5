//! End-to-end exercises of the worker task against scripted platform seams.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::oneshot;

use hamkalam_worker::{
    spawn_worker, AssetFetcher, Notification, NotificationAction, NotificationPresenter,
    WindowClient, WindowClients, WorkerCommand, WorkerDeps, WorkerEffect, WorkerError,
};

type Log = Arc<Mutex<Vec<String>>>;

struct MockPresenter {
    log: Log,
    delay: Duration,
}

#[async_trait]
impl NotificationPresenter for MockPresenter {
    async fn show(&self, notification: Notification) -> Result<(), WorkerError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("show-start:{}", notification.title));
        tokio::time::sleep(self.delay).await;
        self.log.lock().unwrap().push("show-end".to_string());
        Ok(())
    }
}

struct MockFetcher {
    log: Log,
    fail_on: Option<String>,
}

#[async_trait]
impl AssetFetcher for MockFetcher {
    async fn fetch(&self, path: &str) -> Result<Bytes, WorkerError> {
        self.log.lock().unwrap().push(format!("fetch:{path}"));
        if self.fail_on.as_deref() == Some(path) {
            return Err(WorkerError::AssetFetch {
                asset: path.to_string(),
                reason: "offline".to_string(),
            });
        }
        Ok(Bytes::from(format!("body:{path}")))
    }
}

struct MockWindows {
    log: Log,
    clients: Vec<WindowClient>,
}

#[async_trait]
impl WindowClients for MockWindows {
    async fn list(&self) -> Vec<WindowClient> {
        self.clients.clone()
    }

    async fn focus(&self, id: u64) -> Result<(), WorkerError> {
        self.log.lock().unwrap().push(format!("focus:{id}"));
        Ok(())
    }

    async fn open(&self, url: &str) -> Result<(), WorkerError> {
        self.log.lock().unwrap().push(format!("open:{url}"));
        Ok(())
    }
}

struct Harness {
    log: Log,
    cmd_tx: tokio::sync::mpsc::Sender<WorkerCommand>,
    effect_rx: tokio::sync::mpsc::Receiver<WorkerEffect>,
}

fn harness_with(
    delay: Duration,
    fail_on: Option<&str>,
    clients: Vec<WindowClient>,
) -> Harness {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let deps = WorkerDeps {
        presenter: Arc::new(MockPresenter {
            log: log.clone(),
            delay,
        }),
        fetcher: Arc::new(MockFetcher {
            log: log.clone(),
            fail_on: fail_on.map(str::to_string),
        }),
        windows: Arc::new(MockWindows {
            log: log.clone(),
            clients,
        }),
    };
    let (cmd_tx, effect_rx) = spawn_worker(deps);
    Harness {
        log,
        cmd_tx,
        effect_rx,
    }
}

fn harness() -> Harness {
    harness_with(Duration::ZERO, None, Vec::new())
}

async fn fetch(h: &Harness, path: &str) -> Result<Bytes, WorkerError> {
    let (reply, rx) = oneshot::channel();
    h.cmd_tx
        .send(WorkerCommand::Fetch {
            path: path.to_string(),
            reply,
        })
        .await
        .unwrap();
    rx.await.unwrap()
}

#[tokio::test]
async fn test_install_precaches_all_assets() {
    let mut h = harness();

    h.cmd_tx.send(WorkerCommand::Install).await.unwrap();
    assert_eq!(h.effect_rx.recv().await.unwrap(), WorkerEffect::Installed);

    let fetches = h.log.lock().unwrap().len();
    assert_eq!(fetches, 5);

    // Cached asset: served without touching the network again
    let body = fetch(&h, "/static/css/style.css").await.unwrap();
    assert_eq!(body, Bytes::from_static(b"body:/static/css/style.css"));
    assert_eq!(h.log.lock().unwrap().len(), fetches);
}

#[tokio::test]
async fn test_fetch_passes_through_uncached_requests() {
    let mut h = harness();
    h.cmd_tx.send(WorkerCommand::Install).await.unwrap();
    assert_eq!(h.effect_rx.recv().await.unwrap(), WorkerEffect::Installed);

    // Not in the precache list: network both times (no cache fill on miss)
    let _ = fetch(&h, "/api/user_status/3").await.unwrap();
    let _ = fetch(&h, "/api/user_status/3").await.unwrap();

    let log = h.log.lock().unwrap();
    assert_eq!(
        log.iter().filter(|l| *l == "fetch:/api/user_status/3").count(),
        2
    );
}

#[tokio::test]
async fn test_failed_install_leaves_no_partial_cache() {
    let mut h = harness_with(Duration::ZERO, Some("/static/js/chat.js"), Vec::new());

    h.cmd_tx.send(WorkerCommand::Install).await.unwrap();
    assert_eq!(h.effect_rx.recv().await.unwrap(), WorkerEffect::InstallFailed);

    // Even the assets fetched before the failure are gone
    let log_len = h.log.lock().unwrap().len();
    let _ = fetch(&h, "/").await.unwrap();
    assert_eq!(h.log.lock().unwrap().len(), log_len + 1);
}

#[tokio::test]
async fn test_push_suspends_until_notification_shown() {
    let mut h = harness_with(Duration::from_millis(50), None, Vec::new());

    h.cmd_tx
        .send(WorkerCommand::Push {
            payload: r#"{"title":"پیام جدید","body":"سلام"}"#.as_bytes().to_vec(),
        })
        .await
        .unwrap();

    // Queued behind the push; must not be served while the notification is
    // still being shown
    let _ = fetch(&h, "/anything").await.unwrap();

    assert_eq!(
        h.effect_rx.recv().await.unwrap(),
        WorkerEffect::NotificationShown {
            title: "پیام جدید".to_string()
        }
    );

    let log = h.log.lock().unwrap();
    let show_end = log.iter().position(|l| l == "show-end").unwrap();
    let fetch_pos = log.iter().position(|l| l == "fetch:/anything").unwrap();
    assert!(show_end < fetch_pos, "fetch handled before notification shown: {log:?}");
}

#[tokio::test]
async fn test_malformed_push_shows_nothing() {
    let mut h = harness();

    h.cmd_tx
        .send(WorkerCommand::Push {
            payload: b"not json".to_vec(),
        })
        .await
        .unwrap();

    // The loop is still alive and no NotificationShown was emitted
    h.cmd_tx
        .send(WorkerCommand::NotificationClick {
            action: Some(NotificationAction::Close),
            data: None,
        })
        .await
        .unwrap();

    assert_eq!(h.effect_rx.recv().await.unwrap(), WorkerEffect::NotificationClosed);
    assert!(h.log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_close_action_only_closes() {
    let mut h = harness_with(
        Duration::ZERO,
        None,
        vec![WindowClient {
            id: 1,
            url: "https://chat.example/inbox".to_string(),
        }],
    );

    h.cmd_tx
        .send(WorkerCommand::NotificationClick {
            action: Some(NotificationAction::Close),
            data: None,
        })
        .await
        .unwrap();

    assert_eq!(h.effect_rx.recv().await.unwrap(), WorkerEffect::NotificationClosed);
    assert!(h.log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_default_click_focuses_matching_window() {
    let mut h = harness_with(
        Duration::ZERO,
        None,
        vec![
            WindowClient {
                id: 1,
                url: "https://chat.example/about".to_string(),
            },
            WindowClient {
                id: 2,
                url: "https://chat.example/inbox".to_string(),
            },
        ],
    );

    // Body click with no route data lands on the inbox
    h.cmd_tx
        .send(WorkerCommand::NotificationClick {
            action: None,
            data: None,
        })
        .await
        .unwrap();

    assert_eq!(h.effect_rx.recv().await.unwrap(), WorkerEffect::NotificationClosed);
    fetch(&h, "/sync").await.unwrap(); // barrier: click fully processed
    assert_eq!(h.log.lock().unwrap().first().map(String::as_str), Some("focus:2"));
}

#[tokio::test]
async fn test_open_click_without_match_opens_window() {
    let mut h = harness_with(
        Duration::ZERO,
        None,
        vec![WindowClient {
            id: 1,
            url: "https://chat.example/about".to_string(),
        }],
    );

    h.cmd_tx
        .send(WorkerCommand::NotificationClick {
            action: Some(NotificationAction::Open),
            data: Some(hamkalam_shared::protocol::PushData {
                url: Some("/chat/5".to_string()),
            }),
        })
        .await
        .unwrap();

    assert_eq!(h.effect_rx.recv().await.unwrap(), WorkerEffect::NotificationClosed);
    fetch(&h, "/sync").await.unwrap();
    assert_eq!(h.log.lock().unwrap().first().map(String::as_str), Some("open:/chat/5"));
}
