// ABOUTME: Answer request pipeline pieces — send states, tagged in-flight asks, and reply folding.
// ABOUTME: Every settled ask becomes exactly one assistant message, success or failure.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::remote::{AskReply, ChatService, RemoteError};
use crate::session::types::{Message, SessionId};

/// Content used when the server's reply carries no answer text.
pub const NO_RESPONSE_FALLBACK: &str = "No response";

static NEXT_VIEW: AtomicU64 = AtomicU64::new(1);

/// Identifies one visit of a session view. Re-opening the same session yields a new token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewToken(u64);

impl ViewToken {
    pub fn next() -> Self {
        Self(NEXT_VIEW.fetch_add(1, Ordering::Relaxed))
    }
}

/// Observable state of a session's send cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskState {
    Idle,
    Sending,
}

/// How an in-flight ask resolved against the live log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The answer was appended.
    Succeeded,
    /// A synthesized error reply was appended.
    Failed,
    /// The outcome belonged to a view that is no longer live; nothing changed.
    Discarded,
}

/// Where an ask was issued from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskOrigin {
    pub session: SessionId,
    pub view: ViewToken,
}

/// An accepted question waiting to be sent. Holds no borrow of the session,
/// so the network call can run while the view keeps rendering.
#[derive(Debug, Clone)]
pub struct PendingAsk {
    pub origin: AskOrigin,
    pub question: String,
}

impl PendingAsk {
    /// Issue the single outbound request for this ask.
    pub async fn dispatch(self, service: &dyn ChatService) -> AskOutcome {
        let result = service.ask(&self.origin.session, &self.question).await;
        if let Err(e) = &result {
            tracing::warn!(session = %self.origin.session, "ask failed: {}", e);
        }
        AskOutcome {
            origin: self.origin,
            result,
        }
    }
}

/// Result of a dispatched ask, still tagged with its origin.
#[derive(Debug)]
pub struct AskOutcome {
    pub origin: AskOrigin,
    pub result: Result<AskReply, RemoteError>,
}

/// Turn a remote result into the assistant message that records it.
pub fn reply_message(result: Result<AskReply, RemoteError>) -> (Message, Settlement) {
    match result {
        Ok(reply) => {
            let content = reply
                .response
                .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string());
            (Message::assistant(content, reply.sources), Settlement::Succeeded)
        }
        Err(e) => (
            Message::assistant(format!("Error: {}", e), Vec::new()),
            Settlement::Failed,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::Role;

    #[test]
    fn view_tokens_are_unique() {
        let a = ViewToken::next();
        let b = ViewToken::next();
        assert_ne!(a, b);
    }

    #[test]
    fn reply_with_text_and_sources() {
        let (msg, settlement) = reply_message(Ok(AskReply::new(
            "Paris is the capital.",
            vec!["doc.pdf p.3".to_string()],
        )));
        assert_eq!(settlement, Settlement::Succeeded);
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Paris is the capital.");
        assert_eq!(msg.sources, vec!["doc.pdf p.3".to_string()]);
    }

    #[test]
    fn reply_without_text_uses_fallback() {
        let (msg, settlement) = reply_message(Ok(AskReply::default()));
        assert_eq!(settlement, Settlement::Succeeded);
        assert_eq!(msg.content, NO_RESPONSE_FALLBACK);
        assert!(msg.sources.is_empty());
    }

    #[test]
    fn failure_is_rendered_into_content() {
        let (msg, settlement) = reply_message(Err(RemoteError::NotFound));
        assert_eq!(settlement, Settlement::Failed);
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Error: session not found on the server");
        assert!(msg.sources.is_empty());
    }
}
