#[cfg(test)]
mod tests {
    use crate::message::*;
    use crate::event::*;
    use crate::config::*;
    use crate::session::*;
    use crate::error::*;

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_user() {
        let msg = Message::user("m1", "Hello");
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
        assert!(!msg.pending);
    }

    #[test]
    fn test_message_placeholder() {
        let msg = Message::placeholder("m2");
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.content.is_empty());
        assert!(msg.pending);
    }

    #[test]
    fn test_new_message_id_unique() {
        let ids: std::collections::HashSet<String> = (0..500).map(|_| new_message_id()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_message_serialization_roundtrip() {
        let msg = Message::user("m1", "test input");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, msg);
    }

    #[test]
    fn test_message_pending_flag_omitted_when_false() {
        let json = serde_json::to_string(&Message::assistant("a1", "hi")).unwrap();
        assert!(!json.contains("pending"));

        let json = serde_json::to_string(&Message::placeholder("a2")).unwrap();
        assert!(json.contains(r#""pending":true"#));
    }

    #[test]
    fn test_message_timestamp_is_string() {
        let msg = Message::user("m1", "hi");
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value["created_at"].is_string());
    }

    #[test]
    fn test_message_legacy_record() {
        let json = r#"{"id":"x","type":"ai","content":"hey","timestamp":"2024-03-01T10:00:00.000Z","loading":false}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "hey");
        assert_eq!(msg.created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert!(!msg.pending);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
    }

    #[test]
    fn test_role_deserialization() {
        let role: Role = serde_json::from_str(r#""assistant""#).unwrap();
        assert_eq!(role, Role::Assistant);
        let role: Role = serde_json::from_str(r#""ai""#).unwrap();
        assert_eq!(role, Role::Assistant);
        assert!(serde_json::from_str::<Role>(r#""system""#).is_err());
    }

    // ─── MessagePatch Tests ──────────────────────────────────

    #[test]
    fn test_patch_resolve() {
        let mut msg = Message::placeholder("a1");
        MessagePatch::resolve("done").apply(&mut msg);
        assert_eq!(msg.content, "done");
        assert!(!msg.pending);
        assert_eq!(msg.id, "a1");
    }

    #[test]
    fn test_patch_partial() {
        let mut msg = Message::placeholder("a1");
        let patch = MessagePatch { content: Some("partial".to_string()), pending: None };
        patch.apply(&mut msg);
        assert_eq!(msg.content, "partial");
        assert!(msg.pending);
    }

    #[test]
    fn test_patch_empty() {
        assert!(MessagePatch::default().is_empty());
        assert!(!MessagePatch::resolve("").is_empty());
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_chat_event_serialization() {
        let event = ChatEvent::SendStarted {
            user_message_id: "u1".to_string(),
            placeholder_id: "a1".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"SendStarted""#));
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_chat_event_reset() {
        let json = serde_json::to_string(&ChatEvent::Reset).unwrap();
        assert_eq!(json, r#"{"type":"Reset"}"#);
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.visible_window, 5);
        assert_eq!(config.remote.timeout_ms, 60_000);
        assert_eq!(config.storage.backend, StorageBackendType::Auto);
        assert_eq!(config.default_user_name, DEFAULT_USER_NAME);
        assert!(!config.reply_fallback.is_empty());
        assert!(!config.failure_apology.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = ChatConfig::from_json(r#"{"remote":{"timeout_ms":1500}}"#).unwrap();
        assert_eq!(config.remote.timeout_ms, 1500);
        assert_eq!(config.remote.chat_path, "/api/v1/student/ai/chat");
        assert_eq!(config.visible_window, 5);
    }

    #[test]
    fn test_config_validate_rejects_zero_timeout() {
        let result = ChatConfig::from_json(r#"{"remote":{"timeout_ms":0}}"#);
        assert!(matches!(result, Err(ChatError::Config(_))));
    }

    #[test]
    fn test_config_validate_rejects_empty_base() {
        let mut config = ChatConfig::default();
        config.remote.api_base = "  ".to_string();
        assert!(matches!(config.validate(), Err(ChatError::Config(_))));
    }

    #[test]
    fn test_config_validate_rejects_zero_window() {
        let mut config = ChatConfig::default();
        config.visible_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_invalid_json() {
        let result = ChatConfig::from_json("{not json");
        assert!(matches!(result, Err(ChatError::Serialization(_))));
    }

    #[test]
    fn test_chat_url_joins_slashes() {
        let mut remote = RemoteConfig::default();
        remote.api_base = "https://example.com/".to_string();
        assert_eq!(remote.chat_url(), "https://example.com/api/v1/student/ai/chat");
    }

    #[test]
    fn test_storage_keys_follow_prefix() {
        let keys = StorageKeys::default();
        assert_eq!(keys.session_id, "ai_chat_session_id");
        assert_eq!(keys.messages, "ai_chat_messages");
        assert_eq!(keys.expanded, "ai_chat_expanded");

        let custom = StorageConfig {
            backend: StorageBackendType::Memory,
            key_prefix: "tutor:".to_string(),
        };
        assert_eq!(custom.keys().messages, "tutor:messages");
    }

    #[test]
    fn test_storage_backend_type() {
        let json = serde_json::to_string(&StorageBackendType::LocalStorage).unwrap();
        let back: StorageBackendType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StorageBackendType::LocalStorage);
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_session_default() {
        let session = Session::default();
        assert!(session.session_id.is_none());
        assert!(session.messages.is_empty());
        assert!(!session.is_expanded);
        assert!(!session.is_sending);
        assert_eq!(session.user_name, DEFAULT_USER_NAME);
    }

    #[test]
    fn test_connection_status_labels() {
        assert_eq!(ConnectionStatus::Online.label(), "online");
        assert_eq!(ConnectionStatus::Sending.label(), "sending");
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        assert_eq!(ChatError::Timeout(5000).to_string(), "Timeout after 5000ms");
        let err = ChatError::Remote { code: 404, message: "Session not found".to_string() };
        assert_eq!(err.to_string(), "Remote error 404: Session not found");
        assert!(ChatError::Busy.to_string().starts_with("Busy"));
    }

    #[test]
    fn test_error_is_remote_failure() {
        assert!(ChatError::Network("down".to_string()).is_remote_failure());
        assert!(ChatError::Timeout(10).is_remote_failure());
        assert!(ChatError::Remote { code: 500, message: String::new() }.is_remote_failure());
        assert!(!ChatError::Busy.is_remote_failure());
        assert!(!ChatError::Storage("full".to_string()).is_remote_failure());
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let chat_err: ChatError = serde_err.into();
        assert!(matches!(chat_err, ChatError::Serialization(_)));
    }
}
