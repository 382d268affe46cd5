//! Message edit/delete actions.
//!
//! Both actions are fire-and-forget: the REST call either succeeds and the
//! view is updated (plus a relay event emitted for the counterpart), or it
//! fails and nothing changes beyond an alert.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use hamkalam_net::SocketCommand;
use hamkalam_shared::protocol::ClientEvent;
use hamkalam_shared::types::{MessageId, UserId};

use crate::api::MessageApi;
use crate::prompt::{Prompter, DELETE_CONFIRM, DELETE_FAILED, EDIT_FAILED, EDIT_PROMPT};
use crate::view::{ChatView, MessageAction};

/// What became of a user-initiated action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// View updated and relay event emitted.
    Completed,
    /// Cancelled, empty or unchanged input — no network call was made.
    Cancelled,
    /// No message element carries this id.
    UnknownMessage,
    /// The server refused or the call failed; view unchanged.
    Failed,
}

pub struct MessageActionHandler {
    api: Arc<dyn MessageApi>,
    socket_tx: mpsc::Sender<SocketCommand>,
    prompter: Arc<dyn Prompter>,
    view: Arc<Mutex<ChatView>>,
    other_user_id: UserId,
}

impl MessageActionHandler {
    pub fn new(
        api: Arc<dyn MessageApi>,
        socket_tx: mpsc::Sender<SocketCommand>,
        prompter: Arc<dyn Prompter>,
        view: Arc<Mutex<ChatView>>,
        other_user_id: UserId,
    ) -> Self {
        Self {
            api,
            socket_tx,
            prompter,
            view,
            other_user_id,
        }
    }

    /// Prompt for replacement text and edit the message. Empty or unchanged
    /// input is a no-op with no network call.
    pub async fn edit(&self, id: &MessageId) -> ActionOutcome {
        let current = {
            let guard = match self.view.lock() {
                Ok(g) => g,
                Err(_) => return ActionOutcome::Failed,
            };
            match guard.node(id) {
                Some(node) => node.content().to_string(),
                None => return ActionOutcome::UnknownMessage,
            }
        };

        let new_content = match self.prompter.prompt_edit(EDIT_PROMPT, &current) {
            Some(text) => text,
            None => return ActionOutcome::Cancelled,
        };

        if new_content.trim().is_empty() || new_content == current {
            return ActionOutcome::Cancelled;
        }

        if let Err(e) = self.api.edit_message(id, &new_content).await {
            warn!(message_id = %id, error = %e, "Error editing message");
            self.prompter.alert(EDIT_FAILED);
            return ActionOutcome::Failed;
        }

        if let Ok(mut guard) = self.view.lock() {
            let _ = guard.edit_local(id, &new_content);
        }

        self.emit(ClientEvent::EditMessage {
            message_id: id.clone(),
            content: new_content,
            other_user_id: self.other_user_id,
        })
        .await;

        info!(message_id = %id, "Message edited");
        ActionOutcome::Completed
    }

    /// Confirm interactively and delete the message.
    pub async fn delete(&self, id: &MessageId) -> ActionOutcome {
        if !self.prompter.confirm(DELETE_CONFIRM) {
            return ActionOutcome::Cancelled;
        }

        if let Err(e) = self.api.delete_message(id).await {
            warn!(message_id = %id, error = %e, "Error deleting message");
            self.prompter.alert(DELETE_FAILED);
            return ActionOutcome::Failed;
        }

        let outcome = match self.view.lock() {
            Ok(mut guard) => guard.delete_local(id),
            Err(_) => return ActionOutcome::Failed,
        };
        if outcome == crate::view::ApplyOutcome::UnknownMessage {
            return ActionOutcome::UnknownMessage;
        }

        self.emit(ClientEvent::DeleteMessage {
            message_id: id.clone(),
            other_user_id: self.other_user_id,
        })
        .await;

        info!(message_id = %id, "Message deleted");
        ActionOutcome::Completed
    }

    async fn emit(&self, event: ClientEvent) {
        // The local change already succeeded; a dead socket only costs the
        // relay to the counterpart.
        if self.socket_tx.send(SocketCommand::Emit(event)).await.is_err() {
            warn!("Socket closed, relay event dropped");
        }
    }
}

// ---------------------------------------------------------------------------
// Action registry
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Action '{0}' already registered")]
    Duplicate(String),
}

/// Explicit mapping from action marker names to handlers, validated at
/// registration time — the typed replacement for matching CSS class names
/// on bubbled click events.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, MessageAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two marker names the conversation markup uses.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register("edit-message", MessageAction::Edit)
            .expect("empty registry");
        registry
            .register("delete-message", MessageAction::Delete)
            .expect("empty registry");
        registry
    }

    pub fn register(&mut self, name: &str, action: MessageAction) -> Result<(), RegistryError> {
        if self.actions.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        self.actions.insert(name.to_string(), action);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<MessageAction> {
        self.actions.get(name).copied()
    }

    /// Route a click on an action control to the handler. Unknown action
    /// names are ignored with a warning.
    pub async fn dispatch(
        &self,
        handler: &MessageActionHandler,
        name: &str,
        id: &MessageId,
    ) -> Option<ActionOutcome> {
        match self.resolve(name) {
            Some(MessageAction::Edit) => Some(handler.edit(id).await),
            Some(MessageAction::Delete) => Some(handler.delete(id).await),
            None => {
                warn!(action = %name, "Ignoring unregistered action");
                None
            }
        }
    }
}
