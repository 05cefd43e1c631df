//! WASM-target tests for chat-types.
//!
//! Mirrors a subset of the native unit tests under wasm32-unknown-unknown
//! via `wasm-pack test --node`. Timestamps and ids come from JS here.

use wasm_bindgen_test::*;

use chat_types::message::*;
use chat_types::config::*;
use chat_types::session::*;

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_placeholder() {
    let msg = Message::placeholder(new_message_id());
    assert_eq!(msg.role, Role::Assistant);
    assert!(msg.pending);
}

#[wasm_bindgen_test]
fn message_ids_differ() {
    assert_ne!(new_message_id(), new_message_id());
}

#[wasm_bindgen_test]
fn message_roundtrip_keeps_timestamp() {
    let msg = Message::user(new_message_id(), "hello");
    let json = serde_json::to_string(&msg).unwrap();
    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(back.created_at, msg.created_at);
}

// ─── Config / Session Tests ──────────────────────────────

#[wasm_bindgen_test]
fn default_config_is_valid() {
    assert!(ChatConfig::default().validate().is_ok());
}

#[wasm_bindgen_test]
fn session_default_empty() {
    let session = Session::default();
    assert!(session.messages.is_empty());
    assert!(session.session_id.is_none());
}
