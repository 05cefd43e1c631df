//! Persistence bridge between the session store and a durable key-value medium.
//!
//! Three independent keys are owned: identity, message log and expansion flag.
//! Reads tolerate partial or corrupted state field by field; a bad key never
//! affects the other two.
//!
//! Writes are serialized through one lock and stamped with a ticket, so an
//! older snapshot never lands over a newer one. `purge()` bumps a generation
//! counter without waiting for the lock; a write still in flight when that
//! happens is rolled back instead of resurrecting the erased session.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use futures::lock::Mutex;

use chat_types::{
    ChatError, Result,
    config::StorageKeys,
    message::Message,
};
use crate::ports::StoragePort;
use crate::store::SessionStore;

/// Whatever could be recovered from storage. `None` means absent or corrupt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydratedState {
    pub session_id: Option<String>,
    pub messages: Option<Vec<Message>>,
    pub expanded: Option<bool>,
}

impl HydratedState {
    /// Apply the recovered fields to `store`, leaving absent fields untouched.
    pub fn apply_to(self, store: &mut SessionStore) {
        if let Some(id) = self.session_id {
            store.set_session_id(id);
        }
        if let Some(messages) = self.messages {
            store.replace_all_messages(messages);
        }
        if let Some(expanded) = self.expanded {
            store.set_expanded(expanded);
        }
    }
}

/// State to be written, captured synchronously from the store so that no
/// store borrow is held across the storage awaits.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistSnapshot {
    pub session_id: Option<String>,
    /// Never contains pending placeholders
    pub messages: Vec<Message>,
    pub expanded: bool,
}

impl PersistSnapshot {
    pub fn capture(store: &SessionStore) -> Self {
        Self {
            session_id: store.session_id().map(String::from),
            messages: store
                .messages()
                .iter()
                .filter(|m| !m.pending)
                .cloned()
                .collect(),
            expanded: store.is_expanded(),
        }
    }
}

pub struct PersistenceBridge {
    storage: Rc<dyn StoragePort>,
    keys: StorageKeys,
    writer: Mutex<()>,
    /// Bumped by every purge
    generation: Cell<u64>,
    next_ticket: Cell<u64>,
    /// Tickets below this value are stale
    written: Cell<u64>,
}

impl PersistenceBridge {
    pub fn new(storage: Rc<dyn StoragePort>, keys: StorageKeys) -> Self {
        Self {
            storage,
            keys,
            writer: Mutex::new(()),
            generation: Cell::new(0),
            next_ticket: Cell::new(0),
            written: Cell::new(0),
        }
    }

    /// Read all three keys. Never fails: unreadable or corrupt keys are
    /// logged and reported as absent.
    pub async fn hydrate(&self) -> HydratedState {
        log::info!(
            "[chat persist] hydrating from {}",
            self.storage.backend_name()
        );

        let session_id = self.load(&self.keys.session_id, parse_session_id).await;
        let messages = self.load(&self.keys.messages, parse_messages).await;
        let expanded = self.load(&self.keys.expanded, parse_expanded).await;

        log::info!(
            "[chat persist] hydrated: session={:?}, messages={}, expanded={:?}",
            session_id,
            messages.as_ref().map_or(0, Vec::len),
            expanded
        );

        HydratedState { session_id, messages, expanded }
    }

    /// Write every owned key. All three writes are attempted even if one
    /// fails; the first failure is returned.
    ///
    /// Skipped without error when a newer snapshot has already been written
    /// or when the session is purged before or during the write.
    pub async fn persist(&self, snapshot: PersistSnapshot) -> Result<()> {
        let ticket = self.next_ticket.get();
        self.next_ticket.set(ticket + 1);
        let generation = self.generation.get();

        let messages_json = serde_json::to_string(&snapshot.messages)?;
        let flag = if snapshot.expanded { "true" } else { "false" };
        let writes = [
            (&self.keys.session_id, snapshot.session_id.as_deref()),
            (&self.keys.messages, Some(messages_json.as_str())),
            (&self.keys.expanded, Some(flag)),
        ];

        let _writer = self.writer.lock().await;
        if ticket < self.written.get() {
            log::debug!("[chat persist] snapshot {} superseded; skipped", ticket);
            return Ok(());
        }

        let mut first_error = None;
        for (key, value) in writes {
            if self.generation.get() != generation {
                log::info!("[chat persist] session purged; snapshot {} dropped", ticket);
                return Ok(());
            }

            let result = match value {
                Some(value) => self.storage.set(key, value).await,
                None => self.storage.remove(key).await,
            };

            if self.generation.get() != generation {
                log::info!("[chat persist] session purged during write; rolling back {}", key);
                if let Err(e) = self.storage.remove(key).await {
                    log::warn!("[chat persist] rollback of {} failed: {}", key, e);
                }
                return Ok(());
            }
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        self.written.set(ticket + 1);

        log::debug!(
            "[chat persist] saved: session={:?}, messages={}",
            snapshot.session_id,
            snapshot.messages.len()
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Remove all three keys.
    /// Does not wait for a write in flight; that write rolls itself back.
    pub async fn purge(&self) -> Result<()> {
        self.generation.set(self.generation.get() + 1);
        log::info!("[chat persist] purging stored session");
        let identity = self.storage.remove(&self.keys.session_id).await;
        let log_remove = self.storage.remove(&self.keys.messages).await;
        let flag = self.storage.remove(&self.keys.expanded).await;
        identity.and(log_remove).and(flag)
    }

    async fn load<T>(&self, key: &str, parse: fn(&str, &str) -> Result<T>) -> Option<T> {
        let raw = self.read(key).await?;
        recover(key, parse(key, &raw))
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("[chat persist] failed to read {}: {}", key, e);
                None
            }
        }
    }
}

fn recover<T>(key: &str, parsed: Result<T>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("[chat persist] discarding {}: {}", key, e);
            None
        }
    }
}

fn corrupt(key: &str, message: impl Into<String>) -> ChatError {
    ChatError::HydrationCorrupt {
        key: key.to_string(),
        message: message.into(),
    }
}

pub(crate) fn parse_session_id(key: &str, raw: &str) -> Result<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(corrupt(key, "blank session id"));
    }
    Ok(id.to_string())
}

/// Parse the stored log. Pending entries and repeated ids are dropped so the
/// hydrated log satisfies the store's invariants.
pub(crate) fn parse_messages(key: &str, raw: &str) -> Result<Vec<Message>> {
    let parsed: Vec<Message> =
        serde_json::from_str(raw).map_err(|e| corrupt(key, e.to_string()))?;

    let mut seen = HashSet::new();
    let messages: Vec<Message> = parsed
        .into_iter()
        .filter(|m| !m.pending)
        .filter(|m| seen.insert(m.id.clone()))
        .collect();
    Ok(messages)
}

pub(crate) fn parse_expanded(key: &str, raw: &str) -> Result<bool> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(corrupt(key, format!("expected true/false, got {:?}", other))),
    }
}
