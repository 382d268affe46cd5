// Background worker: push notification display, click routing and the
// static asset cache. Runs in its own isolated task and talks to the rest
// of the system exclusively through command/effect channels.

pub mod cache;
pub mod error;
pub mod notify;
pub mod worker;

pub use cache::AssetCache;
pub use error::WorkerError;
pub use notify::{Notification, NotificationAction, NotificationButton};
pub use worker::{
    spawn_worker, AssetFetcher, NotificationPresenter, WindowClient, WindowClients,
    WorkerCommand, WorkerDeps, WorkerEffect,
};
