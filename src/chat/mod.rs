// ABOUTME: Chat module — answer pipeline, session bootstrap, and the context views work against.
// ABOUTME: ChatContext bundles the injected stores and remote service behind narrow operations.

pub mod bootstrap;
pub mod pipeline;
pub mod session;

use std::path::Path;
use std::sync::Arc;

pub use bootstrap::bootstrap;
pub use pipeline::{
    AskOrigin, AskOutcome, AskState, NO_RESPONSE_FALLBACK, PendingAsk, Settlement, ViewToken,
};
pub use session::ChatSession;

use crate::remote::{ChatService, RemoteError};
use crate::session::kv::KeyValueStore;
use crate::session::log_store::SessionLogStore;
use crate::session::registry::SessionRegistry;
use crate::session::types::{ConversationLog, SessionId};

/// Stores and remote service shared by every session view.
#[derive(Clone)]
pub struct ChatContext {
    pub registry: Arc<SessionRegistry>,
    pub logs: Arc<SessionLogStore>,
    pub service: Arc<dyn ChatService>,
}

impl ChatContext {
    /// Registry and logs share one key-value store.
    pub fn new(store: Arc<dyn KeyValueStore>, service: Arc<dyn ChatService>) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new(store.clone())),
            logs: Arc::new(SessionLogStore::new(store)),
            service,
        }
    }

    /// Bootstrap a view of session `id`.
    pub async fn open(&self, id: SessionId) -> ChatSession {
        bootstrap(id, &self.registry, self.logs.clone(), self.service.as_ref()).await
    }

    /// My Chats, in first-visit order.
    pub fn visited(&self) -> Vec<SessionId> {
        self.registry.list_visited()
    }

    /// Last local snapshot of `id`, shown while bootstrap is still running.
    pub fn preview(&self, id: &SessionId) -> ConversationLog {
        self.logs.load_local(id)
    }

    /// Ask the backend for a fresh session and record it in My Chats.
    pub async fn new_chat(&self) -> Result<SessionId, RemoteError> {
        let id = self.service.new_chat().await?;
        self.remember(&id);
        tracing::info!(session = %id, "created empty chat");
        Ok(id)
    }

    /// Upload a document, creating a session grounded on it, and record it in My Chats.
    pub async fn upload_document(&self, path: &Path) -> Result<SessionId, RemoteError> {
        let id = self.service.upload_document(path).await?;
        self.remember(&id);
        tracing::info!(session = %id, document = %path.display(), "created document chat");
        Ok(id)
    }

    fn remember(&self, id: &SessionId) {
        if let Err(e) = self.registry.register_visited(id) {
            tracing::warn!(session = %id, "could not record session in My Chats: {}", e);
        }
    }
}

/// Link others can open to join session `id`.
pub fn share_link(share_base_url: &str, id: &SessionId) -> String {
    format!(
        "{}/chat/{}",
        share_base_url.trim_end_matches('/'),
        id.path_segment()
    )
}
