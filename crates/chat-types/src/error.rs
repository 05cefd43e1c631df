use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("Busy: a message is already being sent")]
    Busy,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote error {code}: {message}")]
    Remote { code: u16, message: String },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt stored value for {key}: {message}")]
    HydrationCorrupt { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),
}

impl ChatError {
    /// True for failures of the remote assistant call itself
    /// (transport, business or timeout).
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            ChatError::Network(_) | ChatError::Remote { .. } | ChatError::Timeout(_)
        )
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
