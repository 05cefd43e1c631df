//! Chat session: the caller-facing context object.
//!
//! Owns one store, one persistence bridge and one send pipeline. There is no
//! global instance; hosts construct as many as they need and hold them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chat_types::{
    Result,
    config::ChatConfig,
    event::ChatEvent,
    message::Message,
    session::{ConnectionStatus, Session},
};
use crate::event_bus::EventBus;
use crate::persistence::{PersistSnapshot, PersistenceBridge};
use crate::pipeline::SendPipeline;
use crate::ports::{RemoteChatPort, RemoteReply, StoragePort, TimerPort};
use crate::store::SessionStore;

pub struct ChatSession {
    store: RefCell<SessionStore>,
    bridge: PersistenceBridge,
    pipeline: SendPipeline,
    event_bus: EventBus,
    /// Closed by the first hydrate or the first send, whichever comes first
    hydration_done: Cell<bool>,
}

impl ChatSession {
    pub fn new(
        config: &ChatConfig,
        remote: Rc<dyn RemoteChatPort>,
        storage: Rc<dyn StoragePort>,
        timer: Rc<dyn TimerPort>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store: RefCell::new(SessionStore::with_options(
                config.default_user_name.clone(),
                config.visible_window,
            )),
            bridge: PersistenceBridge::new(storage, config.storage.keys()),
            pipeline: SendPipeline::new(config, remote, timer),
            event_bus,
            hydration_done: Cell::new(false),
        }
    }

    /// Load persisted state into the store. Only the first call before any
    /// send has an effect; later calls are ignored.
    pub async fn hydrate(&self) {
        if self.hydration_done.replace(true) {
            log::debug!("[chat session] hydrate skipped: already hydrated or sending");
            return;
        }

        let state = self.bridge.hydrate().await;
        let mut store = self.store.borrow_mut();
        if store.has_history() {
            log::warn!("[chat session] a send started during hydration; stored state discarded");
            return;
        }
        state.apply_to(&mut store);
        self.event_bus.emit(ChatEvent::Hydrated {
            message_count: store.message_count(),
            has_session: store.session_id().is_some(),
        });
    }

    /// Send a user message. Rejects with `ChatError::Busy` while another
    /// send is outstanding. Blank input is the caller's to reject.
    pub async fn send(&self, text: &str) -> Result<RemoteReply> {
        if !self.hydration_done.replace(true) {
            log::warn!("[chat session] send before hydrate; stored state will not be loaded");
        }
        self.pipeline
            .run(&self.store, &self.bridge, &self.event_bus, text)
            .await
    }

    /// Erase the conversation and its persisted state.
    pub async fn reset(&self) -> Result<()> {
        self.store.borrow_mut().clear();
        self.event_bus.emit(ChatEvent::Reset);
        self.bridge.purge().await
    }

    pub async fn toggle_expanded(&self) -> Result<bool> {
        let expanded = self.store.borrow_mut().toggle_expanded();
        self.expanded_changed(expanded).await?;
        Ok(expanded)
    }

    pub async fn set_expanded(&self, expanded: bool) -> Result<()> {
        self.store.borrow_mut().set_expanded(expanded);
        self.expanded_changed(expanded).await
    }

    async fn expanded_changed(&self, expanded: bool) -> Result<()> {
        self.event_bus.emit(ChatEvent::ExpandedChanged { expanded });
        let snapshot = PersistSnapshot::capture(&self.store.borrow());
        self.bridge.persist(snapshot).await
    }

    pub fn set_user_name(&self, name: impl Into<String>) {
        self.store.borrow_mut().set_user_name(name);
    }

    // ─── Read-only views ─────────────────────────────────────

    pub fn visible_messages(&self) -> Vec<Message> {
        self.store.borrow().visible_messages().to_vec()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.store.borrow().messages().to_vec()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.store.borrow().connection_status()
    }

    pub fn connection_status_label(&self) -> &'static str {
        self.store.borrow().connection_status_label()
    }

    pub fn is_expanded(&self) -> bool {
        self.store.borrow().is_expanded()
    }

    pub fn is_sending(&self) -> bool {
        self.store.borrow().is_sending()
    }

    pub fn session_id(&self) -> Option<String> {
        self.store.borrow().session_id().map(String::from)
    }

    pub fn user_name(&self) -> String {
        self.store.borrow().user_name().to_string()
    }

    pub fn message_count(&self) -> usize {
        self.store.borrow().message_count()
    }

    pub fn has_history(&self) -> bool {
        self.store.borrow().has_history()
    }

    /// Full copy of the current session state
    pub fn snapshot(&self) -> Session {
        self.store.borrow().session().clone()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
