//! HTTP adapter for the assistant backend.
//!
//! `POST {api_base}/api/v1/student/ai/chat` with `{ message, session_id }`.
//! The backend wraps every answer in `{ code, msg, data }`; only `code == 200`
//! carries a reply. Uses browser `fetch()` via gloo-net for WASM compatibility.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

use chat_core::ports::{RemoteChatPort, RemoteReply, RemoteRequest};
use chat_types::{ChatError, Result, config::RemoteConfig};

const ENVELOPE_OK: i64 = 200;

pub struct HttpChatClient {
    config: RemoteConfig,
    url: String,
}

impl HttpChatClient {
    pub fn new(config: RemoteConfig) -> Self {
        let url = config.chat_url();
        Self { config, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl RemoteChatPort for HttpChatClient {
    async fn send_message(&self, req: RemoteRequest) -> Result<RemoteReply> {
        let body = ApiRequest {
            message: &req.message,
            session_id: req.session_id.as_deref(),
        };

        let mut builder = Request::post(&self.url).header("Content-Type", "application/json");
        if let Some(token) = self.config.auth_token.as_deref() {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        log::debug!("[chat http] POST {}", self.url);
        let response = builder
            .json(&body)
            .map_err(|e| ChatError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Remote {
                code: status,
                message: http_error_message(status, &text),
            });
        }

        parse_chat_envelope(&text)
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}

// ─── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiRequest<'a> {
    message: &'a str,
    session_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct ApiEnvelope {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<ApiChatData>,
}

#[derive(Deserialize)]
struct ApiChatData {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decode a 2xx body. A non-200 envelope code is a business failure.
pub fn parse_chat_envelope(body: &str) -> Result<RemoteReply> {
    let envelope: ApiEnvelope = serde_json::from_str(body)?;

    if envelope.code != ENVELOPE_OK {
        let message = if envelope.msg.is_empty() {
            "request failed".to_string()
        } else {
            envelope.msg
        };
        return Err(ChatError::Remote {
            code: u16::try_from(envelope.code).unwrap_or(0),
            message,
        });
    }

    let data = envelope.data.ok_or_else(|| ChatError::Remote {
        code: 200,
        message: "response carried no data".to_string(),
    })?;

    Ok(RemoteReply {
        session_id: data.session_id.filter(|id| !id.is_empty()),
        reply_text: data.message.unwrap_or_default(),
    })
}

/// Prefer the backend's `msg` or `detail` field over the raw body.
pub(crate) fn http_error_message(status: u16, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = parsed.as_ref().and_then(|v| {
        v.get("msg")
            .and_then(|m| m.as_str())
            .or_else(|| v.get("detail").and_then(|d| d.as_str()))
            .map(String::from)
    });

    match field {
        Some(msg) if !msg.is_empty() => msg,
        _ if body.trim().is_empty() => format!("HTTP {}", status),
        _ => body.trim().to_string(),
    }
}

