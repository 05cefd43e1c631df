use serde::{Deserialize, Serialize};
use crate::message::Message;

/// Greeting label used until the host supplies the user's name
pub const DEFAULT_USER_NAME: &str = "Student";

/// The tracked conversation: remote identity, message log and UI flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Assigned by the remote side on the first successful reply
    pub session_id: Option<String>,
    pub messages: Vec<Message>,
    pub is_expanded: bool,
    pub is_sending: bool,
    pub user_name: String,
}

impl Session {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            session_id: None,
            messages: Vec::new(),
            is_expanded: false,
            is_sending: false,
            user_name: user_name.into(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_USER_NAME)
    }
}

/// Coarse liveness indicator shown next to the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Online,
    Sending,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Online => "online",
            ConnectionStatus::Sending => "sending",
        }
    }
}
