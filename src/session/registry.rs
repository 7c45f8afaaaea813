// ABOUTME: Session registry — the persisted "My Chats" list of every session this client opened.
// ABOUTME: Append-only, deduplicated, insertion-ordered; corrupt records read as empty.

use std::sync::Arc;

use crate::session::kv::{KeyValueStore, StoreError};
use crate::session::types::SessionId;

/// Storage key of the registry record.
pub const REGISTRY_KEY: &str = "myChats";

/// Tracks the set of visited sessions in a key-value store.
pub struct SessionRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record `id` as visited. No-op when already present; otherwise the updated
    /// list is written before returning.
    ///
    /// Errors are reported so the caller can log them, but must never stop the
    /// session from opening.
    ///
    /// A failed read aborts without writing so the existing record survives;
    /// only a missing or corrupt record is replaced.
    pub fn register_visited(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut visited = self.read_visited()?;
        if visited.contains(id) {
            return Ok(());
        }
        visited.push(id.clone());
        let content = serde_json::to_string(&visited)?;
        self.store.put(REGISTRY_KEY, &content)?;
        tracing::debug!(session = %id, total = visited.len(), "registered visited session");
        Ok(())
    }

    /// Visited sessions in the order they were first registered.
    pub fn list_visited(&self) -> Vec<SessionId> {
        self.read_visited().unwrap_or_else(|e| {
            tracing::warn!("failed to read session registry: {}", e);
            Vec::new()
        })
    }

    /// Storage errors propagate; a missing or corrupt record reads as empty.
    fn read_visited(&self) -> Result<Vec<SessionId>, StoreError> {
        let Some(raw) = self.store.get(REGISTRY_KEY)? else {
            return Ok(Vec::new());
        };

        let ids: Vec<String> = match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("session registry is corrupt, treating as empty: {}", e);
                return Ok(Vec::new());
            }
        };

        // Tolerate hand-edited records: drop empties and repeats, keep first occurrence.
        let mut visited: Vec<SessionId> = Vec::with_capacity(ids.len());
        for id in ids.into_iter().filter_map(|raw| SessionId::parse(raw).ok()) {
            if !visited.contains(&id) {
                visited.push(id);
            }
        }
        Ok(visited)
    }
}
