// ABOUTME: Remote answering service contract — ask, load history, and mint new sessions.
// ABOUTME: The HTTP implementation lives in http.rs; tests script the trait directly.

pub mod http;

use std::path::Path;

use async_trait::async_trait;

use crate::session::types::{Message, SessionId};

pub use http::{HttpChatService, create_service};

/// Failure talking to the answering service.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("could not reach the answering service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("session not found on the server")]
    NotFound,

    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response from server: {0}")]
    Malformed(String),

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// Reply to a question. Decoded leniently so a partial reply still reaches the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskReply {
    /// Answer text; `None` when the server omitted it or sent something unusable.
    pub response: Option<String>,
    /// Citations backing the answer, in server order.
    pub sources: Vec<String>,
}

impl AskReply {
    pub fn new(response: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            response: Some(response.into()),
            sources,
        }
    }

    /// Decode `{ response, sources }` from any JSON object.
    ///
    /// A missing, non-string, or empty `response` becomes `None`; non-string
    /// citations are dropped. Only a non-object body is rejected.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, RemoteError> {
        let obj = value
            .as_object()
            .ok_or_else(|| RemoteError::Malformed(format!("expected a JSON object, got {}", value)))?;

        let response = obj
            .get("response")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let sources = obj
            .get("sources")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { response, sources })
    }
}

/// Operations consumed from the answering/session backend.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Ask `question` within session `id`.
    async fn ask(&self, id: &SessionId, question: &str) -> Result<AskReply, RemoteError>;

    /// Fetch the authoritative history of `id`. `Err(NotFound)` for unknown sessions.
    async fn load_chat(&self, id: &SessionId) -> Result<Vec<Message>, RemoteError>;

    /// Create an empty session without document context.
    async fn new_chat(&self) -> Result<SessionId, RemoteError>;

    /// Upload a document for indexing and create a session grounded on it.
    async fn upload_document(&self, path: &Path) -> Result<SessionId, RemoteError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_reply_decodes() {
        let reply = AskReply::from_value(&json!({
            "response": "Paris is the capital.",
            "sources": ["doc.pdf p.3"]
        }))
        .unwrap();
        assert_eq!(reply, AskReply::new("Paris is the capital.", vec!["doc.pdf p.3".to_string()]));
    }

    #[test]
    fn missing_fields_decode_to_empty() {
        let reply = AskReply::from_value(&json!({"detail": "whatever"})).unwrap();
        assert_eq!(reply.response, None);
        assert!(reply.sources.is_empty());
    }

    #[test]
    fn wrong_typed_fields_are_treated_as_missing() {
        let reply = AskReply::from_value(&json!({
            "response": 42,
            "sources": ["a.pdf", 3, null, "b.pdf"]
        }))
        .unwrap();
        assert_eq!(reply.response, None);
        assert_eq!(reply.sources, vec!["a.pdf".to_string(), "b.pdf".to_string()]);
    }

    #[test]
    fn empty_response_counts_as_missing() {
        let reply = AskReply::from_value(&json!({"response": ""})).unwrap();
        assert_eq!(reply.response, None);
    }

    #[test]
    fn non_object_body_is_malformed() {
        let err = AskReply::from_value(&json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[test]
    fn error_messages_are_readable() {
        let err = RemoteError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "index offline".to_string(),
        };
        assert_eq!(err.to_string(), "server returned 500 Internal Server Error: index offline");
        assert_eq!(RemoteError::NotFound.to_string(), "session not found on the server");
    }
}
