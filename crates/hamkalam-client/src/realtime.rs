//! Inbound realtime events, mirrored into the conversation view.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use hamkalam_net::SocketNotification;
use hamkalam_shared::protocol::ServerEvent;

use crate::view::{ApplyOutcome, ChatView};

/// Applies counterpart edits and deletions to the local view.
pub struct RealtimeListener {
    view: Arc<Mutex<ChatView>>,
}

impl RealtimeListener {
    pub fn new(view: Arc<Mutex<ChatView>>) -> Self {
        Self { view }
    }

    /// Apply one relayed event. Unknown message ids and stale sequence
    /// numbers are silent no-ops.
    pub fn apply(&self, event: ServerEvent) {
        let mut guard = match self.view.lock() {
            Ok(g) => g,
            Err(_) => {
                warn!("View lock poisoned, dropping event");
                return;
            }
        };

        let (label, outcome) = match &event {
            ServerEvent::MessageEdited {
                message_id,
                new_content,
                seq,
            } => ("edited", guard.apply_edit(message_id, new_content, *seq)),
            ServerEvent::MessageDeleted { message_id, seq } => {
                ("deleted", guard.apply_delete(message_id, *seq))
            }
        };

        match outcome {
            ApplyOutcome::Applied => {
                debug!(message_id = %event.message_id(), event = label, "Applied relayed event");
            }
            ApplyOutcome::UnknownMessage => {
                debug!(message_id = %event.message_id(), "No element for message, skipping");
            }
            ApplyOutcome::Stale => {
                debug!(message_id = %event.message_id(), "Discarding stale event");
            }
        }
    }

    /// Consume socket notifications until the channel closes or the server
    /// disconnects.
    pub async fn run(&self, mut rx: tokio::sync::mpsc::Receiver<SocketNotification>) {
        while let Some(notification) = rx.recv().await {
            match notification {
                SocketNotification::Event(event) => self.apply(event),
                SocketNotification::Disconnected => {
                    info!("Realtime channel disconnected");
                    break;
                }
            }
        }
        debug!("Realtime listener ended");
    }
}
