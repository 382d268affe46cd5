//! In-memory projection of the conversation markup.
//!
//! The server owns every message; the view holds only the transient
//! presentation state keyed by message id — the text node, the edited badge
//! and the action controls. This is the Rust counterpart of the DOM elements
//! addressed by `data-message-id`.

use std::collections::HashMap;

use hamkalam_shared::constants::{DELETED_OPACITY, DELETED_PLACEHOLDER, EDITED_BADGE};
use hamkalam_shared::types::{MessageId, SeqNo};

/// Action controls attached to a message element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageAction {
    Edit,
    Delete,
}

/// Result of applying a realtime event to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum ApplyOutcome {
    Applied,
    /// No element carries this message id; silently ignored.
    UnknownMessage,
    /// The event is at or below the last applied sequence; discarded.
    Stale,
}

/// Presentation state of one message element.
#[derive(Debug, Clone)]
pub struct MessageNode {
    content: String,
    edited: bool,
    deleted: bool,
    opacity: f32,
    actions: Vec<MessageAction>,
    last_seq: SeqNo,
}

impl MessageNode {
    fn new(content: String) -> Self {
        Self {
            content,
            edited: false,
            deleted: false,
            opacity: 1.0,
            actions: vec![MessageAction::Edit, MessageAction::Delete],
            last_seq: SeqNo(0),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content as rendered, with the edited badge appended at most once.
    pub fn rendered_content(&self) -> String {
        if self.edited {
            format!("{}{}", self.content, EDITED_BADGE)
        } else {
            self.content.clone()
        }
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn actions(&self) -> &[MessageAction] {
        &self.actions
    }

    fn edit(&mut self, content: String) {
        self.content = content;
        self.edited = true;
    }

    fn delete(&mut self) {
        self.deleted = true;
        self.opacity = DELETED_OPACITY;
        self.content = DELETED_PLACEHOLDER.to_string();
        self.actions.clear();
    }
}

/// All message elements currently on the page, keyed by `data-message-id`.
#[derive(Debug, Default)]
pub struct ChatView {
    nodes: HashMap<MessageId, MessageNode>,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a message element, as the page template does when rendering
    /// the conversation history.
    pub fn mount(&mut self, id: MessageId, content: impl Into<String>) {
        self.nodes.insert(id, MessageNode::new(content.into()));
    }

    pub fn node(&self, id: &MessageId) -> Option<&MessageNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Apply a locally confirmed edit (already acknowledged over REST).
    pub fn edit_local(&mut self, id: &MessageId, content: &str) -> ApplyOutcome {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.edit(content.to_string());
                ApplyOutcome::Applied
            }
            None => ApplyOutcome::UnknownMessage,
        }
    }

    /// Apply a locally confirmed deletion.
    pub fn delete_local(&mut self, id: &MessageId) -> ApplyOutcome {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.delete();
                ApplyOutcome::Applied
            }
            None => ApplyOutcome::UnknownMessage,
        }
    }

    /// Apply a relayed edit. Discards anything at or below the last applied
    /// sequence for this message, so a stale edit can never overwrite a
    /// newer edit or deletion.
    pub fn apply_edit(&mut self, id: &MessageId, content: &str, seq: SeqNo) -> ApplyOutcome {
        match self.nodes.get_mut(id) {
            Some(node) => {
                if seq <= node.last_seq {
                    return ApplyOutcome::Stale;
                }
                node.last_seq = seq;
                node.edit(content.to_string());
                ApplyOutcome::Applied
            }
            None => ApplyOutcome::UnknownMessage,
        }
    }

    /// Apply a relayed deletion, with the same sequence guard.
    pub fn apply_delete(&mut self, id: &MessageId, seq: SeqNo) -> ApplyOutcome {
        match self.nodes.get_mut(id) {
            Some(node) => {
                if seq <= node.last_seq {
                    return ApplyOutcome::Stale;
                }
                node.last_seq = seq;
                node.delete();
                ApplyOutcome::Applied
            }
            None => ApplyOutcome::UnknownMessage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(id: &str, content: &str) -> ChatView {
        let mut view = ChatView::new();
        view.mount(MessageId::from(id), content);
        view
    }

    #[test]
    fn test_edit_appends_badge_once() {
        let mut view = view_with("42", "hi");
        let id = MessageId::from("42");

        assert_eq!(view.apply_edit(&id, "hello", SeqNo(1)), ApplyOutcome::Applied);
        // Same content delivered again with a newer seq: idempotent badge
        assert_eq!(view.apply_edit(&id, "hello", SeqNo(2)), ApplyOutcome::Applied);

        let node = view.node(&id).unwrap();
        assert_eq!(node.content(), "hello");
        assert_eq!(node.rendered_content(), format!("hello{EDITED_BADGE}"));
        assert_eq!(node.rendered_content().matches("ویرایش شده").count(), 1);
    }

    #[test]
    fn test_edit_unknown_message_is_noop() {
        let mut view = view_with("1", "hi");
        let outcome = view.apply_edit(&MessageId::from("999"), "x", SeqNo(1));
        assert_eq!(outcome, ApplyOutcome::UnknownMessage);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_delete_replaces_content_and_strips_actions() {
        let mut view = view_with("7", "secret");
        let id = MessageId::from("7");

        assert_eq!(view.delete_local(&id), ApplyOutcome::Applied);

        let node = view.node(&id).unwrap();
        assert!(node.is_deleted());
        assert_eq!(node.content(), DELETED_PLACEHOLDER);
        assert!(node.actions().is_empty());
        assert_eq!(node.opacity(), DELETED_OPACITY);
    }

    #[test]
    fn test_stale_edit_after_delete_is_discarded() {
        let mut view = view_with("7", "secret");
        let id = MessageId::from("7");

        assert_eq!(view.apply_delete(&id, SeqNo(5)), ApplyOutcome::Applied);
        // An edit that was in flight before the deletion arrives late
        assert_eq!(view.apply_edit(&id, "stale", SeqNo(4)), ApplyOutcome::Stale);

        let node = view.node(&id).unwrap();
        assert_eq!(node.content(), DELETED_PLACEHOLDER);
        assert!(node.is_deleted());
    }

    #[test]
    fn test_equal_seq_is_stale() {
        let mut view = view_with("3", "a");
        let id = MessageId::from("3");

        assert_eq!(view.apply_edit(&id, "b", SeqNo(2)), ApplyOutcome::Applied);
        assert_eq!(view.apply_edit(&id, "c", SeqNo(2)), ApplyOutcome::Stale);
        assert_eq!(view.node(&id).unwrap().content(), "b");
    }

    #[test]
    fn test_fresh_node_has_action_controls() {
        let view = view_with("1", "hi");
        let node = view.node(&MessageId::from("1")).unwrap();
        assert_eq!(node.actions(), &[MessageAction::Edit, MessageAction::Delete]);
        assert!(!node.is_edited());
        assert_eq!(node.opacity(), 1.0);
    }
}
