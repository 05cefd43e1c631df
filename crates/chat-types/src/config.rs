use serde::{Deserialize, Serialize};
use crate::{ChatError, Result};
use crate::session::DEFAULT_USER_NAME;

/// Top-level session manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub remote: RemoteConfig,
    pub storage: StorageConfig,
    /// How many trailing messages the caller renders
    pub visible_window: usize,
    pub default_user_name: String,
    /// Shown when the remote side answers with an empty reply
    pub reply_fallback: String,
    /// Shown in place of the reply when the remote call fails
    pub failure_apology: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            storage: StorageConfig::default(),
            visible_window: 5,
            default_user_name: DEFAULT_USER_NAME.to_string(),
            reply_fallback: DEFAULT_REPLY_FALLBACK.to_string(),
            failure_apology: DEFAULT_FAILURE_APOLOGY.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ChatConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.remote.api_base.trim().is_empty() {
            return Err(ChatError::Config("remote.api_base must not be empty".to_string()));
        }
        if self.remote.timeout_ms == 0 {
            return Err(ChatError::Config("remote.timeout_ms must be positive".to_string()));
        }
        if self.visible_window == 0 {
            return Err(ChatError::Config("visible_window must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub api_base: String,
    pub chat_path: String,
    /// Sent as a bearer token when present
    pub auth_token: Option<String>,
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            chat_path: "/api/v1/student/ai/chat".to_string(),
            auth_token: None,
            timeout_ms: 60_000,
        }
    }
}

impl RemoteConfig {
    pub fn chat_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
            key_prefix: "ai_chat_".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn keys(&self) -> StorageKeys {
        StorageKeys {
            session_id: format!("{}session_id", self.key_prefix),
            messages: format!("{}messages", self.key_prefix),
            expanded: format!("{}expanded", self.key_prefix),
        }
    }
}

/// The three independent slots owned by the persistence bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub session_id: String,
    pub messages: String,
    pub expanded: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        StorageConfig::default().keys()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    Auto,
    Memory,
    LocalStorage,
}

const DEFAULT_REPLY_FALLBACK: &str = "Sorry, no reply is available right now.";

const DEFAULT_FAILURE_APOLOGY: &str =
    "Sorry, the assistant can't reply at the moment. Please try again later.";
