//! Session store: the authoritative in-memory conversation state.
//!
//! The store performs no I/O. Mutations are synchronous and are issued by one
//! owner at a time (hydration at startup, then the send pipeline). Persistence
//! is orchestrated by callers, never triggered from here.

use chat_types::message::{Message, MessagePatch};
use chat_types::session::{ConnectionStatus, Session, DEFAULT_USER_NAME};

/// Default number of trailing messages returned by [`SessionStore::visible_messages`]
pub const DEFAULT_VISIBLE_WINDOW: usize = 5;

pub struct SessionStore {
    session: Session,
    visible_window: usize,
    /// Bumped on every `clear()` so in-flight sends can detect a reset
    epoch: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_options(DEFAULT_USER_NAME, DEFAULT_VISIBLE_WINDOW)
    }

    pub fn with_options(user_name: impl Into<String>, visible_window: usize) -> Self {
        Self {
            session: Session::new(user_name),
            visible_window: visible_window.max(1),
            epoch: 0,
        }
    }

    // ─── Accessors ───────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.session_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.session.messages
    }

    pub fn is_expanded(&self) -> bool {
        self.session.is_expanded
    }

    pub fn is_sending(&self) -> bool {
        self.session.is_sending
    }

    pub fn user_name(&self) -> &str {
        &self.session.user_name
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // ─── Mutators ────────────────────────────────────────────

    /// Replace the conversation identity. Empty ids are ignored.
    pub fn set_session_id(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if id.trim().is_empty() {
            log::warn!("[chat store] ignoring empty session id");
            return false;
        }
        log::debug!("[chat store] set session id: {}", id);
        self.session.session_id = Some(id);
        true
    }

    /// Append at the tail. Callers guarantee the id is fresh.
    pub fn append_message(&mut self, message: Message) {
        log::debug!(
            "[chat store] append {} message {}",
            message.role.label(),
            message.id
        );
        self.session.messages.push(message);
    }

    /// Merge `patch` into the message with `id`.
    ///
    /// Returns `false` when no such message exists; this happens when a reply
    /// lands after the session was cleared and is not an error.
    pub fn update_message(&mut self, id: &str, patch: MessagePatch) -> bool {
        match self.session.messages.iter_mut().find(|m| m.id == id) {
            Some(msg) => {
                log::debug!("[chat store] update message {}: {:?}", id, patch);
                patch.apply(msg);
                true
            }
            None => {
                log::info!("[chat store] update for unknown message {} ignored", id);
                false
            }
        }
    }

    /// Swap in a whole log. Used by hydration only.
    pub fn replace_all_messages(&mut self, messages: Vec<Message>) {
        log::debug!("[chat store] replace log with {} messages", messages.len());
        self.session.messages = messages;
    }

    /// Erase identity, log and flags. The user name survives.
    pub fn clear(&mut self) {
        log::debug!("[chat store] clear");
        self.session.session_id = None;
        self.session.messages.clear();
        self.session.is_expanded = false;
        self.session.is_sending = false;
        self.epoch += 1;
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.session.is_expanded = expanded;
    }

    pub fn toggle_expanded(&mut self) -> bool {
        self.session.is_expanded = !self.session.is_expanded;
        self.session.is_expanded
    }

    pub fn set_sending(&mut self, sending: bool) {
        self.session.is_sending = sending;
    }

    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.session.user_name = name.into();
    }

    // ─── Derivations ─────────────────────────────────────────

    /// The trailing window of the log, in original order.
    pub fn visible_messages(&self) -> &[Message] {
        let messages = &self.session.messages;
        let start = messages.len().saturating_sub(self.visible_window);
        &messages[start..]
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        if self.session.is_sending {
            ConnectionStatus::Sending
        } else {
            ConnectionStatus::Online
        }
    }

    pub fn connection_status_label(&self) -> &'static str {
        self.connection_status().label()
    }

    pub fn message_count(&self) -> usize {
        self.session.messages.len()
    }

    pub fn has_history(&self) -> bool {
        !self.session.messages.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.session.messages.iter().filter(|m| m.pending).count()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
