//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the client can start with zero
//! configuration against a local development server.

use hamkalam_shared::constants::WORKER_SCRIPT;
use hamkalam_shared::types::UserId;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API.
    /// Env: `HAMKALAM_SERVER_URL`
    /// Default: `http://127.0.0.1:5000`
    pub server_url: String,

    /// Websocket URL of the realtime endpoint.
    /// Env: `HAMKALAM_SOCKET_URL`
    /// Default: `ws://127.0.0.1:5000/socket`
    pub socket_url: String,

    /// Path of the background worker script handed to the platform.
    /// Env: `HAMKALAM_WORKER_SCRIPT`
    pub worker_script: String,

    /// URL-safe base64 VAPID public key for push subscription.
    /// Env: `HAMKALAM_VAPID_KEY`
    /// Default: empty (push subscription disabled).
    pub vapid_public_key: String,

    /// Identifier of the conversation counterpart, carried on relayed
    /// edit/delete events.
    /// Env: `HAMKALAM_OTHER_USER_ID`
    pub other_user_id: Option<UserId>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            socket_url: "ws://127.0.0.1:5000/socket".to_string(),
            worker_script: WORKER_SCRIPT.to_string(),
            vapid_public_key: String::new(),
            other_user_id: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("HAMKALAM_SERVER_URL") {
            config.server_url = url;
        }

        if let Ok(url) = std::env::var("HAMKALAM_SOCKET_URL") {
            config.socket_url = url;
        }

        if let Ok(path) = std::env::var("HAMKALAM_WORKER_SCRIPT") {
            config.worker_script = path;
        }

        if let Ok(key) = std::env::var("HAMKALAM_VAPID_KEY") {
            config.vapid_public_key = key;
        }

        if let Ok(val) = std::env::var("HAMKALAM_OTHER_USER_ID") {
            match val.parse::<i64>() {
                Ok(id) => config.other_user_id = Some(UserId(id)),
                Err(e) => {
                    tracing::warn!(value = %val, error = %e, "Invalid HAMKALAM_OTHER_USER_ID, ignoring");
                }
            }
        }

        config
    }
}
