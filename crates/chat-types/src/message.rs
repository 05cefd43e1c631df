use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Older stored logs tag assistant turns as `"ai"`
    #[serde(alias = "ai")]
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single entry in the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(alias = "type")]
    pub role: Role,
    /// Empty while the message is pending
    #[serde(default)]
    pub content: String,
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Set only on the assistant placeholder awaiting its remote reply
    #[serde(default, alias = "loading", skip_serializing_if = "std::ops::Not::not")]
    pub pending: bool,
}

impl Message {
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: text.into(),
            created_at: Utc::now(),
            pending: false,
        }
    }

    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: text.into(),
            created_at: Utc::now(),
            pending: false,
        }
    }

    /// Assistant message with no content yet, resolved in place once the reply lands.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            pending: true,
            ..Self::assistant(id, String::new())
        }
    }
}

/// Generate a fresh message id. Ids are random v4 UUIDs and never reused.
pub fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Partial update merged into an existing message.
/// Only `content` and `pending` may change after creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub pending: Option<bool>,
}

impl MessagePatch {
    /// Patch that turns a placeholder into a final assistant reply.
    pub fn resolve(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            pending: Some(false),
        }
    }

    pub fn apply(self, msg: &mut Message) {
        if let Some(content) = self.content {
            msg.content = content;
        }
        if let Some(pending) = self.pending {
            msg.pending = pending;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.pending.is_none()
    }
}
