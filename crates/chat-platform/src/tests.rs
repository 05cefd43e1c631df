#[cfg(test)]
mod tests {
    use crate::remote::http::{http_error_message, parse_chat_envelope, HttpChatClient};
    use crate::storage::MemoryStorage;
    use chat_core::ports::StoragePort;
    use chat_types::config::RemoteConfig;
    use chat_types::ChatError;

    fn block_on<F: std::future::Future<Output = T>, T>(f: F) -> T {
        futures::executor::block_on(f)
    }

    // ─── Envelope Tests ──────────────────────────────────────

    #[test]
    fn test_envelope_success() {
        let body = r#"{"code":200,"msg":"ok","data":{"session_id":"s1","message":"Hi there","timestamp":"2024-03-01T10:00:00"}}"#;
        let reply = parse_chat_envelope(body).unwrap();
        assert_eq!(reply.session_id.as_deref(), Some("s1"));
        assert_eq!(reply.reply_text, "Hi there");
    }

    #[test]
    fn test_envelope_empty_reply_text() {
        let body = r#"{"code":200,"msg":"ok","data":{"session_id":"s1","message":null}}"#;
        let reply = parse_chat_envelope(body).unwrap();
        assert!(reply.reply_text.is_empty());
    }

    #[test]
    fn test_envelope_blank_session_id_is_absent() {
        let body = r#"{"code":200,"data":{"session_id":"","message":"x"}}"#;
        assert!(parse_chat_envelope(body).unwrap().session_id.is_none());
    }

    #[test]
    fn test_envelope_business_error() {
        let body = r#"{"code":404,"msg":"Session not found","data":null}"#;
        let err = parse_chat_envelope(body).unwrap_err();
        assert_eq!(
            err,
            ChatError::Remote { code: 404, message: "Session not found".to_string() }
        );
        assert!(err.is_remote_failure());
    }

    #[test]
    fn test_envelope_business_error_without_msg() {
        let err = parse_chat_envelope(r#"{"code":500}"#).unwrap_err();
        assert_eq!(err, ChatError::Remote { code: 500, message: "request failed".to_string() });
    }

    #[test]
    fn test_envelope_missing_data() {
        let err = parse_chat_envelope(r#"{"code":200,"msg":"ok"}"#).unwrap_err();
        assert!(matches!(err, ChatError::Remote { code: 200, .. }));
    }

    #[test]
    fn test_envelope_not_json() {
        let err = parse_chat_envelope("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ChatError::Serialization(_)));
    }

    #[test]
    fn test_http_error_message_prefers_fields() {
        assert_eq!(http_error_message(401, r#"{"msg":"token expired"}"#), "token expired");
        assert_eq!(http_error_message(422, r#"{"detail":"bad field"}"#), "bad field");
        assert_eq!(http_error_message(502, "  "), "HTTP 502");
        assert_eq!(http_error_message(500, "boom\n"), "boom");
    }

    #[test]
    fn test_client_url() {
        let mut config = RemoteConfig::default();
        config.api_base = "https://tutor.example.com/".to_string();
        let client = HttpChatClient::new(config);
        assert_eq!(client.url(), "https://tutor.example.com/api/v1/student/ai/chat");
    }

    // ─── MemoryStorage Tests ─────────────────────────────────

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        block_on(async {
            assert!(storage.get("k").await.unwrap().is_none());
            storage.set("k", "v1").await.unwrap();
            storage.set("k", "v2").await.unwrap();
            assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v2"));
            storage.remove("k").await.unwrap();
            assert!(storage.get("k").await.unwrap().is_none());
            storage.remove("k").await.unwrap();
        });
        assert_eq!(storage.backend_name(), "memory");
    }
}
