use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::types::{MessageId, SeqNo, UserId};

/// Realtime events emitted by the page after a successful REST call, so the
/// server can relay the change to the counterpart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// A message was edited locally
    EditMessage {
        message_id: MessageId,
        content: String,
        other_user_id: UserId,
    },

    /// A message was deleted locally
    DeleteMessage {
        message_id: MessageId,
        other_user_id: UserId,
    },
}

/// Realtime events relayed from the counterpart via the server.
///
/// Each event carries a per-message sequence number assigned by the server;
/// the view discards anything at or below the last applied sequence so an
/// edit arriving after a delete cannot resurrect the message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    MessageEdited {
        message_id: MessageId,
        new_content: String,
        seq: SeqNo,
    },

    MessageDeleted {
        message_id: MessageId,
        seq: SeqNo,
    },
}

impl ClientEvent {
    /// Encode to a socket text frame: `{"event": "...", "data": {...}}`
    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            ClientEvent::EditMessage { .. } => "edit_message",
            ClientEvent::DeleteMessage { .. } => "delete_message",
        }
    }
}

impl ServerEvent {
    pub fn from_frame(text: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))?;

        match value.get("event").and_then(|v| v.as_str()) {
            Some("message_edited") | Some("message_deleted") => serde_json::from_value(value)
                .map_err(|e| ProtocolError::MalformedFrame(e.to_string())),
            Some(other) => Err(ProtocolError::UnknownEvent(other.to_string())),
            None => Err(ProtocolError::MalformedFrame("missing event field".to_string())),
        }
    }

    pub fn message_id(&self) -> &MessageId {
        match self {
            ServerEvent::MessageEdited { message_id, .. } => message_id,
            ServerEvent::MessageDeleted { message_id, .. } => message_id,
        }
    }
}

/// Structured payload delivered to the background worker on a push event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    /// Icon override; the worker falls back to the app logo when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Routing data, carried through to the notification click handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PushData>,
}

/// Routing data attached to a push payload / displayed notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PushPayload {
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(data).map_err(|e| ProtocolError::MalformedPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_frame_shape() {
        let ev = ClientEvent::EditMessage {
            message_id: MessageId::from("42"),
            content: "سلام".to_string(),
            other_user_id: UserId(7),
        };

        let frame = ev.to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["event"], "edit_message");
        assert_eq!(value["data"]["message_id"], "42");
        assert_eq!(value["data"]["other_user_id"], 7);
    }

    #[test]
    fn test_server_event_decode() {
        let frame = r#"{"event":"message_deleted","data":{"message_id":"9","seq":3}}"#;
        let ev = ServerEvent::from_frame(frame).unwrap();
        assert_eq!(
            ev,
            ServerEvent::MessageDeleted {
                message_id: MessageId::from("9"),
                seq: SeqNo(3),
            }
        );
    }

    #[test]
    fn test_unknown_event_is_an_error() {
        let frame = r#"{"event":"typing","data":{"user_id":1}}"#;
        match ServerEvent::from_frame(frame) {
            Err(ProtocolError::UnknownEvent(name)) => assert_eq!(name, "typing"),
            other => panic!("expected UnknownEvent, got {other:?}"),
        }
    }

    #[test]
    fn test_push_payload_defaults() {
        let payload = PushPayload::from_bytes(r#"{"title":"پیام جدید","body":"hi"}"#.as_bytes()).unwrap();
        assert_eq!(payload.title, "پیام جدید");
        assert!(payload.icon.is_none());
        assert!(payload.data.is_none());
    }

    #[test]
    fn test_push_payload_with_route() {
        let payload =
            PushPayload::from_bytes(br#"{"title":"t","body":"b","data":{"url":"/chat/5"}}"#)
                .unwrap();
        assert_eq!(payload.data.unwrap().url.as_deref(), Some("/chat/5"));
    }

    #[test]
    fn test_malformed_payload() {
        assert!(PushPayload::from_bytes(b"not json").is_err());
        assert!(PushPayload::from_bytes(br#"{"title":"only"}"#).is_err());
    }
}
