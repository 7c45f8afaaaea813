// ABOUTME: Session bootstrap — run once when a session view becomes active.
// ABOUTME: Registers the id in My Chats, then adopts the reconciled remote history as the live log.

use std::sync::Arc;

use crate::chat::session::ChatSession;
use crate::remote::ChatService;
use crate::session::log_store::SessionLogStore;
use crate::session::registry::SessionRegistry;
use crate::session::types::SessionId;

/// Enter session `id`. Never fails: registry trouble is logged and ignored,
/// remote trouble yields an empty history.
pub async fn bootstrap(
    id: SessionId,
    registry: &SessionRegistry,
    logs: Arc<SessionLogStore>,
    service: &dyn ChatService,
) -> ChatSession {
    if let Err(e) = registry.register_visited(&id) {
        tracing::warn!(session = %id, "could not record session in My Chats: {}", e);
    }

    let log = logs.reconcile_with_remote(&id, service).await;
    tracing::info!(session = %id, messages = log.len(), "session ready");
    ChatSession::new(id, log, logs)
}
