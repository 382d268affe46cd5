//! REST client for the chat server's JSON API.
//!
//! Every endpoint is a single POST with a JSON body (or none) and a small
//! JSON response carrying a `success` flag. Components depend on the
//! per-concern traits below rather than on [`ApiClient`] itself, so tests
//! can substitute mock backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use hamkalam_shared::types::{MessageId, Theme};

use crate::push::PushSubscriptionInfo;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded {0}")]
    Status(u16),

    #[error("Request rejected by the server")]
    Rejected,

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub success: bool,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
struct EditMessageRequest<'a> {
    message_id: &'a MessageId,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct DeleteMessageRequest<'a> {
    message_id: &'a MessageId,
}

#[derive(Debug, Clone, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// One search hit, rendered as a link into the relevant conversation.
/// The timestamp arrives preformatted by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub chat_link: String,
    pub sender_name: String,
    pub receiver_name: String,
    pub content: String,
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Per-concern trait seams
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ThemeApi: Send + Sync {
    async fn toggle_theme(&self) -> Result<ThemeResponse, ApiError>;
}

#[async_trait]
pub trait MessageApi: Send + Sync {
    async fn edit_message(&self, id: &MessageId, content: &str) -> Result<(), ApiError>;
    async fn delete_message(&self, id: &MessageId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search_messages(&self, query: &str) -> Result<Vec<SearchResult>, ApiError>;
}

#[async_trait]
pub trait PushApi: Send + Sync {
    async fn subscribe_push(&self, subscription: &PushSubscriptionInfo) -> Result<(), ApiError>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            base_url: server_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let resp = self.http.post(self.endpoint(path)).json(body).send().await?;

        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ThemeApi for ApiClient {
    async fn toggle_theme(&self) -> Result<ThemeResponse, ApiError> {
        // State-changing call with no body
        let resp = self.http.post(self.endpoint("/api/toggle_theme")).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }

        let body: ThemeResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::InvalidBody(e.to_string()))?;

        if !body.success {
            return Err(ApiError::Rejected);
        }
        Ok(body)
    }
}

#[async_trait]
impl MessageApi for ApiClient {
    async fn edit_message(&self, id: &MessageId, content: &str) -> Result<(), ApiError> {
        let resp = self
            .post_json(
                "/api/edit_message",
                &EditMessageRequest {
                    message_id: id,
                    content,
                },
            )
            .await?;

        let ack: AckResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::InvalidBody(e.to_string()))?;

        if !ack.success {
            return Err(ApiError::Rejected);
        }
        Ok(())
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), ApiError> {
        let resp = self
            .post_json("/api/delete_message", &DeleteMessageRequest { message_id: id })
            .await?;

        let ack: AckResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::InvalidBody(e.to_string()))?;

        if !ack.success {
            return Err(ApiError::Rejected);
        }
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for ApiClient {
    async fn search_messages(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let resp = self
            .post_json("/api/search_messages", &SearchRequest { query })
            .await?;

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::InvalidBody(e.to_string()))?;

        Ok(body.results)
    }
}

#[async_trait]
impl PushApi for ApiClient {
    async fn subscribe_push(&self, subscription: &PushSubscriptionInfo) -> Result<(), ApiError> {
        // The response body is ignored; only transport/status failures matter
        let _ = self.post_json("/api/subscribe_push", subscription).await?;
        debug!("Push subscription submitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joining() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(
            client.endpoint("/api/toggle_theme"),
            "http://localhost:5000/api/toggle_theme"
        );
    }

    #[test]
    fn test_theme_response_decode() {
        let body: ThemeResponse = serde_json::from_str(r#"{"success":true,"theme":"dark"}"#).unwrap();
        assert!(body.success);
        assert_eq!(body.theme, Theme::Dark);
    }

    #[test]
    fn test_edit_request_shape() {
        let id = MessageId::from("42");
        let req = EditMessageRequest {
            message_id: &id,
            content: "hello",
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["message_id"], "42");
        assert_eq!(value["content"], "hello");
    }

    #[test]
    fn test_search_response_decode() {
        let json = r#"{"results":[{
            "chat_link":"/chat/3",
            "sender_name":"نیما",
            "receiver_name":"سارا",
            "content":"جزوه را فرستادم",
            "timestamp":"09:15"
        }]}"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.results.len(), 1);
        assert_eq!(body.results[0].chat_link, "/chat/3");
    }
}
