//! Worker event loop with tokio mpsc command/effect pattern.
//!
//! The worker task owns the asset cache and drives three platform seams:
//! the notification presenter, the asset fetcher and the window client
//! registry. It shares no state with the page; everything arrives as a
//! command and leaves as an effect or a trait call.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use hamkalam_shared::constants::{CACHE_NAME, PRECACHED_ASSETS};
use hamkalam_shared::protocol::{PushData, PushPayload};

use crate::cache::AssetCache;
use crate::error::WorkerError;
use crate::notify::{resolve_click_url, Notification, NotificationAction};

// ---------------------------------------------------------------------------
// Platform seams
// ---------------------------------------------------------------------------

/// Displays notifications. `show` resolves only once the notification is
/// actually visible; the worker will not take another command before then.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    async fn show(&self, notification: Notification) -> Result<(), WorkerError>;
}

/// Network access for cache fills and pass-through fetches.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Bytes, WorkerError>;
}

/// An open window-like client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: u64,
    pub url: String,
}

/// Enumerate, focus and open window clients.
#[async_trait]
pub trait WindowClients: Send + Sync {
    async fn list(&self) -> Vec<WindowClient>;
    async fn focus(&self, id: u64) -> Result<(), WorkerError>;
    async fn open(&self, url: &str) -> Result<(), WorkerError>;
}

// ---------------------------------------------------------------------------
// Command / effect types
// ---------------------------------------------------------------------------

/// Commands sent *into* the worker task.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Pre-populate the asset cache; the worker is not installed until this
    /// completes.
    Install,
    /// An intercepted request: cached body if present, network otherwise.
    Fetch {
        path: String,
        reply: oneshot::Sender<Result<Bytes, WorkerError>>,
    },
    /// A push delivery with its raw payload bytes.
    Push { payload: Vec<u8> },
    /// A click on a displayed notification. `action` is `None` for a click
    /// on the notification body.
    NotificationClick {
        action: Option<NotificationAction>,
        data: Option<PushData>,
    },
}

/// Effects sent *from* the worker task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEffect {
    Installed,
    InstallFailed,
    NotificationShown { title: String },
    NotificationClosed,
}

/// Dependencies injected into the worker task.
pub struct WorkerDeps {
    pub presenter: Arc<dyn NotificationPresenter>,
    pub fetcher: Arc<dyn AssetFetcher>,
    pub windows: Arc<dyn WindowClients>,
}

/// Spawn the worker in a background tokio task.
///
/// Returns `(command_tx, effect_rx)`. The task ends when the command
/// sender is dropped.
pub fn spawn_worker(
    deps: WorkerDeps,
) -> (mpsc::Sender<WorkerCommand>, mpsc::Receiver<WorkerEffect>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (effect_tx, effect_rx) = mpsc::channel(32);

    tokio::spawn(async move {
        worker_loop(deps, cmd_rx, effect_tx).await;
    });

    (cmd_tx, effect_rx)
}

async fn worker_loop(
    deps: WorkerDeps,
    mut cmd_rx: mpsc::Receiver<WorkerCommand>,
    effect_tx: mpsc::Sender<WorkerEffect>,
) {
    let mut cache = AssetCache::new(CACHE_NAME);

    while let Some(command) = cmd_rx.recv().await {
        match command {
            WorkerCommand::Install => {
                let effect = match install(&deps, &mut cache).await {
                    Ok(()) => {
                        info!(cache = cache.name(), assets = cache.len(), "Worker installed");
                        WorkerEffect::Installed
                    }
                    Err(e) => {
                        warn!(error = %e, "Worker install failed");
                        cache.clear();
                        WorkerEffect::InstallFailed
                    }
                };
                if effect_tx.send(effect).await.is_err() {
                    break;
                }
            }

            WorkerCommand::Fetch { path, reply } => {
                let result = match cache.lookup(&path) {
                    Some(body) => {
                        debug!(path = %path, "Serving from cache");
                        Ok(body)
                    }
                    // Pass through; responses are not added to the cache
                    None => deps.fetcher.fetch(&path).await,
                };
                let _ = reply.send(result);
            }

            WorkerCommand::Push { payload } => {
                let payload = match PushPayload::from_bytes(&payload) {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(error = %e, "Dropping undecodable push payload");
                        continue;
                    }
                };

                let notification = Notification::from_payload(payload);
                let title = notification.title.clone();

                // The push event is not complete until the notification is
                // visible; the platform unregisters workers that skip this.
                match deps.presenter.show(notification).await {
                    Ok(()) => {
                        if effect_tx
                            .send(WorkerEffect::NotificationShown { title })
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Error showing notification");
                    }
                }
            }

            WorkerCommand::NotificationClick { action, data } => {
                if effect_tx.send(WorkerEffect::NotificationClosed).await.is_err() {
                    break;
                }

                if action == Some(NotificationAction::Close) {
                    continue;
                }

                let target = resolve_click_url(data.as_ref());
                if let Err(e) = route_click(&deps, &target).await {
                    warn!(error = %e, url = %target, "Error routing notification click");
                }
            }
        }
    }

    debug!("Worker loop ended");
}

/// Fill the cache with the fixed asset list. Any failed fetch fails the
/// whole install.
async fn install(deps: &WorkerDeps, cache: &mut AssetCache) -> Result<(), WorkerError> {
    for asset in PRECACHED_ASSETS {
        let body = deps.fetcher.fetch(asset).await?;
        cache.insert(asset, body);
    }
    Ok(())
}

/// Focus the first open window already showing the target path, or open a
/// new one.
async fn route_click(deps: &WorkerDeps, target: &str) -> Result<(), WorkerError> {
    for client in deps.windows.list().await {
        if client.url.contains(target) {
            debug!(id = client.id, url = %client.url, "Focusing existing window");
            return deps.windows.focus(client.id).await;
        }
    }

    debug!(url = %target, "Opening new window");
    deps.windows.open(target).await
}
