// ABOUTME: ChatSession — the live, mutable conversation of one open session view.
// ABOUTME: Drives Idle -> Sending -> Succeeded/Failed -> Idle and persists after every answer.

use std::sync::Arc;

use crate::chat::pipeline::{
    AskOrigin, AskOutcome, AskState, PendingAsk, Settlement, ViewToken, reply_message,
};
use crate::remote::ChatService;
use crate::session::log_store::SessionLogStore;
use crate::session::types::{ConversationLog, Message, SessionId};

/// The one live log of a session view. Only obtainable through bootstrap, so
/// nothing can be sent before reconciliation has settled.
pub struct ChatSession {
    id: SessionId,
    view: ViewToken,
    log: ConversationLog,
    in_flight: usize,
    logs: Arc<SessionLogStore>,
}

impl ChatSession {
    pub(crate) fn new(id: SessionId, log: ConversationLog, logs: Arc<SessionLogStore>) -> Self {
        Self {
            id,
            view: ViewToken::next(),
            log,
            in_flight: 0,
            logs,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn view(&self) -> ViewToken {
        self.view
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// True strictly between accepting a question and settling its answer.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight > 0
    }

    pub fn state(&self) -> AskState {
        if self.is_in_flight() {
            AskState::Sending
        } else {
            AskState::Idle
        }
    }

    /// Whether an outcome tagged with `origin` targets this view.
    pub fn owns(&self, origin: &AskOrigin) -> bool {
        origin.session == self.id && origin.view == self.view
    }

    /// Accept the question in `input`, append it, and clear `input`.
    ///
    /// Returns `None` without touching anything when the input is blank.
    pub fn begin_send(&mut self, input: &mut String) -> Option<PendingAsk> {
        if input.trim().is_empty() {
            return None;
        }
        let question = std::mem::take(input);
        self.log.push(Message::user(question.clone()));
        self.in_flight += 1;
        Some(PendingAsk {
            origin: AskOrigin {
                session: self.id.clone(),
                view: self.view,
            },
            question,
        })
    }

    /// Fold a dispatched ask back into the log: append the answer or error,
    /// persist, and drop the in-flight mark. Outcomes from other views are discarded.
    pub fn complete(&mut self, outcome: AskOutcome) -> Settlement {
        if !self.owns(&outcome.origin) || self.in_flight == 0 {
            tracing::debug!(
                session = %outcome.origin.session,
                "discarding answer for a view that is no longer live"
            );
            return Settlement::Discarded;
        }

        let (message, settlement) = reply_message(outcome.result);
        self.log.push(message);
        if let Err(e) = self.logs.persist(&self.id, &self.log) {
            tracing::warn!(session = %self.id, "failed to persist conversation: {}", e);
        }
        self.in_flight -= 1;
        settlement
    }

    /// Run one whole exchange. `None` when the input was blank and nothing was sent.
    pub async fn send(
        &mut self,
        input: &mut String,
        service: &dyn ChatService,
    ) -> Option<Settlement> {
        let pending = self.begin_send(input)?;
        let outcome = pending.dispatch(service).await;
        Some(self.complete(outcome))
    }
}
