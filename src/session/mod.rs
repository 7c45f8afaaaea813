// ABOUTME: Session module — conversation data model and its local persistence.
// ABOUTME: Provides the My Chats registry and per-session log snapshots over a key-value store.

pub mod kv;
pub mod log_store;
pub mod registry;
pub mod types;

pub use kv::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use log_store::SessionLogStore;
pub use registry::SessionRegistry;
pub use types::{ConversationLog, Message, Role, SessionId, SessionIdError};
