use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body for `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

/// Response body from `POST /api/chat`. Both fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatResponse {
    /// Reply text, treating an empty string the same as a missing one
    pub fn reply_text(&self) -> Option<&str> {
        self.response.as_deref().filter(|text| !text.is_empty())
    }

    /// Session token, treating an empty string the same as a missing one
    pub fn session_token(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed chat response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Remote chat endpoint
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;
}

/// HTTP client for the chat endpoint
#[derive(Clone)]
pub struct HttpChatBackend {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpChatBackend {
    /// No request timeout is set; the transport defaults apply.
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        tracing::debug!(endpoint = %self.endpoint, has_session = request.session_id.is_some(), "posting chat message");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
