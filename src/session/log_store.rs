// ABOUTME: Session log store — local snapshots of each conversation plus reconciliation with the remote.
// ABOUTME: Remote wins on load; any remote failure degrades to an empty history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::remote::{ChatService, RemoteError};
use crate::session::kv::{KeyValueStore, StoreError};
use crate::session::types::{ConversationLog, SessionId};

/// Storage key of the snapshot for `id`.
pub fn log_key(id: &SessionId) -> String {
    format!("chatLog-{}", id)
}

/// On-disk shape of one persisted conversation.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogSnapshot {
    pub session_id: SessionId,
    pub updated_at: DateTime<Utc>,
    pub messages: ConversationLog,
}

/// Older records hold only the message array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLog {
    Snapshot(LogSnapshot),
    Bare(ConversationLog),
}

/// Per-session message logs over a key-value store.
pub struct SessionLogStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionLogStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last persisted log for `id`, or an empty log when none (or an unreadable one) exists.
    pub fn load_local(&self, id: &SessionId) -> ConversationLog {
        let raw = match self.store.get(&log_key(id)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ConversationLog::new(),
            Err(e) => {
                tracing::warn!(session = %id, "failed to read local log: {}", e);
                return ConversationLog::new();
            }
        };

        match serde_json::from_str::<StoredLog>(&raw) {
            Ok(StoredLog::Snapshot(snapshot)) => snapshot.messages,
            Ok(StoredLog::Bare(messages)) => messages,
            Err(e) => {
                tracing::warn!(session = %id, "local log is corrupt, ignoring it: {}", e);
                ConversationLog::new()
            }
        }
    }

    /// Replace the local snapshot for `id` with `log`.
    pub fn persist(&self, id: &SessionId, log: &ConversationLog) -> Result<(), StoreError> {
        let snapshot = LogSnapshot {
            session_id: id.clone(),
            updated_at: Utc::now(),
            messages: log.clone(),
        };
        let content = serde_json::to_string_pretty(&snapshot)?;
        self.store.put(&log_key(id), &content)
    }

    /// Fetch the authoritative log for `id`.
    ///
    /// A well-formed remote log replaces whatever the caller held and becomes the
    /// new local snapshot. Not-found, transport failures and malformed payloads
    /// all yield an empty log and leave the local snapshot untouched.
    pub async fn reconcile_with_remote(
        &self,
        id: &SessionId,
        service: &dyn ChatService,
    ) -> ConversationLog {
        match service.load_chat(id).await {
            Ok(messages) => {
                let log = ConversationLog::from(messages);
                tracing::debug!(session = %id, messages = log.len(), "adopted remote history");
                if let Err(e) = self.persist(id, &log) {
                    tracing::warn!(session = %id, "failed to cache remote history: {}", e);
                }
                log
            }
            Err(RemoteError::NotFound) => {
                tracing::debug!(session = %id, "no remote history for session");
                ConversationLog::new()
            }
            Err(e) => {
                tracing::warn!(session = %id, "remote history unavailable, starting empty: {}", e);
                ConversationLog::new()
            }
        }
    }
}
