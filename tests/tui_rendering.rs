// ABOUTME: E2E tests for TUI rendering using ratatui's TestBackend.
// ABOUTME: Verifies home, loading, and live chat screens render from real session state.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use docchat::chat::ChatContext;
use docchat::remote::{AskReply, ChatService, RemoteError};
use docchat::session::{ConversationLog, MemoryStore, Message, SessionId};
use docchat::tui::state::{AppEvent, Notice, Screen, TuiState};
use docchat::tui::ui;

/// Serves one fixed history and answers every question the same way.
struct FixedService {
    history: Vec<Message>,
}

#[async_trait]
impl ChatService for FixedService {
    async fn ask(&self, _id: &SessionId, _question: &str) -> Result<AskReply, RemoteError> {
        Ok(AskReply::new("fixed answer", vec![]))
    }

    async fn load_chat(&self, _id: &SessionId) -> Result<Vec<Message>, RemoteError> {
        Ok(self.history.clone())
    }

    async fn new_chat(&self) -> Result<SessionId, RemoteError> {
        Err(RemoteError::Malformed("not supported".to_string()))
    }

    async fn upload_document(&self, _path: &Path) -> Result<SessionId, RemoteError> {
        Err(RemoteError::Malformed("not supported".to_string()))
    }
}

fn id(raw: &str) -> SessionId {
    SessionId::parse(raw).unwrap()
}

/// Extract a single row of text from the terminal buffer as a String.
fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buf = terminal.backend().buffer();
    let width = buf.area.width;
    (0..width)
        .map(|x| {
            buf.cell((x, y))
                .map(|c| c.symbol().chars().next().unwrap_or(' '))
                .unwrap_or(' ')
        })
        .collect()
}

/// Extract all text from the terminal buffer as a single string (rows joined by newlines).
fn all_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let height = buf.area.height;
    (0..height)
        .map(|y| row_text(terminal, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn draw(state: &mut TuiState) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|frame| ui::render(frame, state)).unwrap();
    terminal
}

async fn ready_state(history: Vec<Message>) -> TuiState {
    let ctx = ChatContext::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedService { history }),
    );
    let mut state = TuiState::new("http://localhost:8000".to_string(), vec![]);
    let ticket = state.open_chat(id("abc"), ConversationLog::new());
    let session = ctx.open(id("abc")).await;
    state.apply(AppEvent::Bootstrapped { ticket, session });
    state
}

#[test]
fn renders_home_with_chats() {
    let mut state = TuiState::new(
        "http://localhost:8000".to_string(),
        vec![id("first-chat"), id("second-chat")],
    );
    let terminal = draw(&mut state);

    assert!(row_text(&terminal, 0).contains("docchat"));
    let text = all_text(&terminal);
    assert!(text.contains("My Chats"), "got:\n{}", text);
    assert!(text.contains("❯"), "got:\n{}", text);
    assert!(text.contains("first-chat"), "got:\n{}", text);
    assert!(text.contains("second-chat"), "got:\n{}", text);
    assert!(row_text(&terminal, 23).contains("http://localhost:8000"));
}

#[test]
fn renders_empty_home_hint() {
    let mut state = TuiState::new(String::new(), vec![]);
    let text = all_text(&draw(&mut state));
    assert!(text.contains("No chats yet"), "got:\n{}", text);
}

#[test]
fn renders_home_error_notice() {
    let mut state = TuiState::new(String::new(), vec![]);
    if let Screen::Home(home) = &mut state.screen {
        home.notice = Some(Notice::Error("could not reach the answering service".to_string()));
    }
    let text = all_text(&draw(&mut state));
    assert!(text.contains("Error: could not reach"), "got:\n{}", text);
}

#[test]
fn renders_loading_preview() {
    let mut state = TuiState::new(String::new(), vec![]);
    let preview = ConversationLog::from(vec![Message::user("cached question")]);
    state.open_chat(id("abc"), preview);

    let text = all_text(&draw(&mut state));
    assert!(text.contains("cached question"), "got:\n{}", text);
    assert!(text.contains("loading"), "got:\n{}", text);
    assert!(row_text(&draw(&mut state), 0).contains("abc"));
}

#[tokio::test]
async fn renders_reconciled_history_with_citations() {
    let mut state = ready_state(vec![
        Message::user("What does section 2 say?"),
        Message::assistant("It covers setup.", vec!["manual.pdf (page 7)".to_string()]),
    ])
    .await;

    let text = all_text(&draw(&mut state));
    assert!(text.contains("What does section 2 say?"), "got:\n{}", text);
    assert!(text.contains("⏺"), "got:\n{}", text);
    assert!(text.contains("It covers setup."), "got:\n{}", text);
    assert!(text.contains("Citations:"), "got:\n{}", text);
    assert!(text.contains("• manual.pdf (page 7)"), "got:\n{}", text);
    assert!(text.contains("2 messages"), "got:\n{}", text);
}

#[tokio::test]
async fn renders_typed_input_and_pending_indicator() {
    let mut state = ready_state(vec![]).await;
    state.input = "draft question".to_string();
    state.move_cursor_end();
    let text = all_text(&draw(&mut state));
    assert!(text.contains("draft question"), "got:\n{}", text);

    let Screen::Chat(view) = &mut state.screen else {
        panic!("expected chat screen");
    };
    let docchat::tui::state::ChatPhase::Ready(session) = &mut view.phase else {
        panic!("expected ready chat");
    };
    session.begin_send(&mut state.input).unwrap();

    let text = all_text(&draw(&mut state));
    assert!(text.contains("❯"), "got:\n{}", text);
    assert!(text.contains("draft question"), "got:\n{}", text);
    assert!(text.contains("waiting for answer"), "got:\n{}", text);
}

#[tokio::test]
async fn long_history_keeps_latest_message_visible() {
    let history: Vec<Message> = (0..40)
        .map(|i| Message::assistant(format!("answer number {}", i), vec![]))
        .collect();
    let mut state = ready_state(history).await;

    let text = all_text(&draw(&mut state));
    assert!(text.contains("answer number 39"), "got:\n{}", text);
    assert!(
        !text
            .lines()
            .any(|line| line.trim_end().ends_with("answer number 0")),
        "oldest answer should be scrolled out of view, got:\n{}",
        text,
    );
}
