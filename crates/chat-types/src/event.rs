use serde::{Deserialize, Serialize};

/// Events emitted by the chat session.
/// Hosts that poll instead of awaiting `send` drain these to refresh their view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatEvent {
    /// Persisted state was loaded into the store
    Hydrated { message_count: usize, has_session: bool },

    /// User message and placeholder were appended
    SendStarted { user_message_id: String, placeholder_id: String },

    /// The placeholder was resolved with the remote reply
    ReplyReceived { placeholder_id: String, session_id: Option<String> },

    /// The placeholder was resolved with the apology text
    SendFailed { placeholder_id: String, error: String },

    /// Session and persisted state were erased
    Reset,

    ExpandedChanged { expanded: bool },
}
