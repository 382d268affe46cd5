//! Notification construction from push payloads.

use hamkalam_shared::constants::{DEFAULT_CLICK_URL, NOTIFICATION_BADGE, VIBRATION_PATTERN};
use hamkalam_shared::protocol::{PushData, PushPayload};

/// Action buttons offered on every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationButton {
    pub action: NotificationAction,
    pub title: String,
}

/// A notification ready to hand to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub actions: Vec<NotificationButton>,
    pub data: Option<PushData>,
}

impl Notification {
    /// Build the displayed notification: payload fields plus the fixed
    /// badge, vibration pattern and the open/close action pair.
    pub fn from_payload(payload: PushPayload) -> Self {
        Self {
            title: payload.title,
            body: payload.body,
            icon: payload
                .icon
                .unwrap_or_else(|| NOTIFICATION_BADGE.to_string()),
            badge: NOTIFICATION_BADGE.to_string(),
            vibrate: VIBRATION_PATTERN.to_vec(),
            actions: vec![
                NotificationButton {
                    action: NotificationAction::Open,
                    title: "باز کردن".to_string(),
                },
                NotificationButton {
                    action: NotificationAction::Close,
                    title: "بستن".to_string(),
                },
            ],
            data: payload.data,
        }
    }
}

/// Target of a notification click: the payload's route, or the inbox.
pub fn resolve_click_url(data: Option<&PushData>) -> String {
    data.and_then(|d| d.url.clone())
        .unwrap_or_else(|| DEFAULT_CLICK_URL.to_string())
}
