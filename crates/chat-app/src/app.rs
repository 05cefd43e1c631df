//! JavaScript-facing handle around one chat session.
//!
//! Async operations return Promises; structured values cross the boundary as
//! plain JS objects (serialized with serde_json, parsed with `JSON.parse`).

use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use chat_core::event_bus::EventBus;
use chat_core::session::ChatSession;
use chat_platform::remote::HttpChatClient;
use chat_platform::storage::open_storage;
use chat_platform::timer::BrowserTimer;
use chat_types::{ChatError, config::ChatConfig};

#[wasm_bindgen]
pub struct ChatHandle {
    session: Rc<ChatSession>,
}

#[wasm_bindgen]
impl ChatHandle {
    /// Build a session from an optional JSON config. Missing fields take
    /// their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ChatHandle, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) => ChatConfig::from_json(json),
            None => Ok(ChatConfig::default()),
        }
        .map_err(|e| to_js_error(&e))?;

        let session = build_session(&config).map_err(|e| to_js_error(&e))?;
        Ok(ChatHandle { session: Rc::new(session) })
    }

    /// Load persisted state. Call once before the first `send`.
    pub fn hydrate(&self) -> js_sys::Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            session.hydrate().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Resolves with `{ session_id, reply_text }`. Rejects with an `Error`
    /// whose `name` is the failure kind (`busy`, `network`, `remote`, `timeout`, ...).
    pub fn send(&self, text: String) -> js_sys::Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            match session.send(&text).await {
                Ok(reply) => to_js(&reply),
                Err(e) => Err(to_js_error(&e)),
            }
        })
    }

    pub fn reset(&self) -> js_sys::Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            session.reset().await.map_err(|e| to_js_error(&e))?;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = toggleExpanded)]
    pub fn toggle_expanded(&self) -> js_sys::Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            let expanded = session.toggle_expanded().await.map_err(|e| to_js_error(&e))?;
            Ok(JsValue::from_bool(expanded))
        })
    }

    #[wasm_bindgen(js_name = setExpanded)]
    pub fn set_expanded(&self, expanded: bool) -> js_sys::Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            session.set_expanded(expanded).await.map_err(|e| to_js_error(&e))?;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = setUserName)]
    pub fn set_user_name(&self, name: String) {
        self.session.set_user_name(name);
    }

    #[wasm_bindgen(js_name = visibleMessages)]
    pub fn visible_messages(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.visible_messages())
    }

    pub fn messages(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.messages())
    }

    /// Full session state, including flags
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.snapshot())
    }

    /// Events since the last call, oldest first
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.event_bus().drain())
    }

    #[wasm_bindgen(getter, js_name = hasPendingEvents)]
    pub fn has_pending_events(&self) -> bool {
        self.session.event_bus().has_pending()
    }

    #[wasm_bindgen(getter, js_name = connectionStatusLabel)]
    pub fn connection_status_label(&self) -> String {
        self.session.connection_status_label().to_string()
    }

    #[wasm_bindgen(getter, js_name = isExpanded)]
    pub fn is_expanded(&self) -> bool {
        self.session.is_expanded()
    }

    #[wasm_bindgen(getter, js_name = isSending)]
    pub fn is_sending(&self) -> bool {
        self.session.is_sending()
    }

    #[wasm_bindgen(getter, js_name = sessionId)]
    pub fn session_id(&self) -> Option<String> {
        self.session.session_id()
    }

    #[wasm_bindgen(getter, js_name = userName)]
    pub fn user_name(&self) -> String {
        self.session.user_name()
    }

    #[wasm_bindgen(getter, js_name = messageCount)]
    pub fn message_count(&self) -> usize {
        self.session.message_count()
    }

    #[wasm_bindgen(getter, js_name = hasHistory)]
    pub fn has_history(&self) -> bool {
        self.session.has_history()
    }
}

/// Assemble the browser adapters into a session.
fn build_session(config: &ChatConfig) -> chat_types::Result<ChatSession> {
    let storage = open_storage(&config.storage.backend)?;
    let remote = Rc::new(HttpChatClient::new(config.remote.clone()));
    log::info!(
        "Chat session wired: remote={}, storage={}, timeout={}ms",
        remote.url(),
        storage.backend_name(),
        config.remote.timeout_ms
    );
    Ok(ChatSession::new(
        config,
        remote,
        storage,
        Rc::new(BrowserTimer),
        EventBus::new(),
    ))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| to_js_error(&e.into()))?;
    js_sys::JSON::parse(&json)
        .map_err(|e| to_js_error(&ChatError::JsInterop(format!("{:?}", e))))
}

fn to_js_error(e: &ChatError) -> JsValue {
    let err = js_sys::Error::new(&e.to_string());
    err.set_name(error_kind(e));
    err.into()
}

/// Stable kind string the host can branch on
pub(crate) fn error_kind(e: &ChatError) -> &'static str {
    match e {
        ChatError::Busy => "busy",
        ChatError::Network(_) => "network",
        ChatError::Remote { .. } => "remote",
        ChatError::Timeout(_) => "timeout",
        ChatError::Storage(_) => "storage",
        ChatError::Serialization(_) => "serialization",
        ChatError::HydrationCorrupt { .. } => "hydration_corrupt",
        ChatError::Config(_) => "config",
        ChatError::JsInterop(_) => "js_interop",
    }
}
