// ABOUTME: reqwest-backed ChatService talking to the document QA backend over HTTP.
// ABOUTME: Maps status codes and payload shapes onto RemoteError variants.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ServerConfig;
use crate::remote::{AskReply, ChatService, RemoteError};
use crate::session::types::{Message, SessionId};

#[derive(Deserialize)]
struct LoadChatResponse {
    messages: Vec<Message>,
}

/// HTTP client for the answering service.
#[derive(Clone)]
pub struct HttpChatService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatService {
    /// Build a client for `config.base_url` with the configured timeouts.
    pub fn new(config: &ServerConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Read the body of a successful response, or turn a failed one into an error.
    async fn read_body(response: reqwest::Response) -> Result<String, RemoteError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Status {
                status,
                body: error_detail(&body),
            });
        }
        Ok(body)
    }

    fn parse_json(body: &str) -> Result<serde_json::Value, RemoteError> {
        serde_json::from_str(body).map_err(|e| RemoteError::Malformed(e.to_string()))
    }
}

/// Prefer FastAPI-style `{"detail": "..."}` over the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(|s| s.to_string()))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Extract the `chat_id` minted by `/new` and `/upload-pdf`.
fn session_id_from(value: &serde_json::Value) -> Result<SessionId, RemoteError> {
    let raw = value
        .get("chat_id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RemoteError::Malformed("response has no chat_id".to_string()))?;
    SessionId::parse(raw).map_err(|e| RemoteError::Malformed(e.to_string()))
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn ask(&self, id: &SessionId, question: &str) -> Result<AskReply, RemoteError> {
        let url = self.url(&format!("ask/{}", id.path_segment()));
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "question": question }))
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        AskReply::from_value(&Self::parse_json(&body)?)
    }

    async fn load_chat(&self, id: &SessionId) -> Result<Vec<Message>, RemoteError> {
        let url = self.url(&format!("load-chat/{}", id.path_segment()));
        let response = self.client.get(&url).send().await?;
        let body = Self::read_body(response).await?;
        let parsed: LoadChatResponse =
            serde_json::from_str(&body).map_err(|e| RemoteError::Malformed(e.to_string()))?;
        Ok(parsed.messages)
    }

    async fn new_chat(&self) -> Result<SessionId, RemoteError> {
        let response = self.client.post(self.url("new")).send().await?;
        let body = Self::read_body(response).await?;
        session_id_from(&Self::parse_json(&body)?)
    }

    async fn upload_document(&self, path: &Path) -> Result<SessionId, RemoteError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("upload-pdf"))
            .multipart(form)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        session_id_from(&Self::parse_json(&body)?)
    }
}

/// Create the answering service client from config.
pub fn create_service(config: &ServerConfig) -> anyhow::Result<Arc<dyn ChatService>> {
    if config.base_url.trim().is_empty() {
        anyhow::bail!("server.base_url is empty; set it in config or via DOCCHAT_SERVER_URL");
    }
    let service = HttpChatService::new(config)?;
    Ok(Arc::new(service))
}
