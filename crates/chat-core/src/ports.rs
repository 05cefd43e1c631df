//! Port traits for the hexagonal architecture boundary.
//!
//! These traits are defined here in `chat-core` (pure Rust).
//! Implementations live in `chat-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use chat_types::Result;

// ─── Remote Chat Port ────────────────────────────────────────

/// One user turn sent to the remote assistant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteRequest {
    pub message: String,
    /// `None` until the remote side has assigned a conversation
    pub session_id: Option<String>,
}

/// Reply from the remote assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteReply {
    pub session_id: Option<String>,
    pub reply_text: String,
}

#[async_trait(?Send)]
pub trait RemoteChatPort {
    /// Send one message and wait for the full reply.
    /// Transport and business failures both surface as `Err`.
    async fn send_message(&self, req: RemoteRequest) -> Result<RemoteReply>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Storage Port ────────────────────────────────────────────

/// String-keyed durable slots. Each `set` must replace the value atomically;
/// there are no transactions across keys.
#[async_trait(?Send)]
pub trait StoragePort {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Timer Port ──────────────────────────────────────────────

#[async_trait(?Send)]
pub trait TimerPort {
    /// Resolve after `ms` milliseconds
    async fn sleep(&self, ms: u64);
}
