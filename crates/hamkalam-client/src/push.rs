//! Push notification subscription.
//!
//! Verifies platform support, registers the background worker, asks for
//! permission, subscribes against the server's VAPID key and submits the
//! resulting descriptor. Every failure aborts the remaining steps and is
//! logged only — the user is never bothered about push being unavailable.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::PushApi;

/// Browser-issued subscription descriptor, serialized as-is to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushSubscriptionInfo {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Outcome of the notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Dismissed,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

/// The platform surface the subscriber drives: worker registration,
/// permission prompt and the push service subscription itself.
#[async_trait]
pub trait PushPlatform: Send + Sync {
    /// Whether the platform can run a background worker and deliver push.
    fn supports_push(&self) -> bool;

    async fn register_worker(&self, script: &str) -> Result<(), PlatformError>;

    async fn request_permission(&self) -> Result<Permission, PlatformError>;

    async fn subscribe(&self, server_key: &[u8]) -> Result<PushSubscriptionInfo, PlatformError>;
}

/// How the subscription attempt ended. Only ever logged, never shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushSetup {
    Completed,
    Unsupported,
    PermissionDenied,
    Failed,
}

/// Decode a URL-safe base64 VAPID public key into the binary form the
/// subscription call expects. Tolerates both padded and unpadded input.
pub fn decode_server_key(key: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(key.trim_end_matches('='))
}

pub struct PushSubscriber {
    platform: Arc<dyn PushPlatform>,
    api: Arc<dyn PushApi>,
    vapid_public_key: String,
    worker_script: String,
}

impl PushSubscriber {
    pub fn new(
        platform: Arc<dyn PushPlatform>,
        api: Arc<dyn PushApi>,
        vapid_public_key: String,
        worker_script: String,
    ) -> Self {
        Self {
            platform,
            api,
            vapid_public_key,
            worker_script,
        }
    }

    /// Run the whole subscription sequence once.
    pub async fn run(&self) -> PushSetup {
        if !self.platform.supports_push() {
            debug!("Push notifications not supported");
            return PushSetup::Unsupported;
        }

        if let Err(e) = self.platform.register_worker(&self.worker_script).await {
            warn!(error = %e, "Error registering background worker");
            return PushSetup::Failed;
        }
        debug!(script = %self.worker_script, "Background worker registered");

        match self.platform.request_permission().await {
            Ok(Permission::Granted) => {}
            Ok(_) => {
                info!("Notification permission denied");
                return PushSetup::PermissionDenied;
            }
            Err(e) => {
                warn!(error = %e, "Error requesting notification permission");
                return PushSetup::Failed;
            }
        }

        let server_key = match decode_server_key(&self.vapid_public_key) {
            Ok(key) if !key.is_empty() => key,
            Ok(_) => {
                warn!("No VAPID key configured, skipping push subscription");
                return PushSetup::Failed;
            }
            Err(e) => {
                warn!(error = %e, "Invalid VAPID key");
                return PushSetup::Failed;
            }
        };

        let subscription = match self.platform.subscribe(&server_key).await {
            Ok(sub) => sub,
            Err(e) => {
                warn!(error = %e, "Error subscribing to push");
                return PushSetup::Failed;
            }
        };

        if let Err(e) = self.api.subscribe_push(&subscription).await {
            warn!(error = %e, "Error submitting push subscription");
            return PushSetup::Failed;
        }

        info!("Push subscription successful");
        PushSetup::Completed
    }
}
