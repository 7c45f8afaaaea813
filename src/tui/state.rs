// ABOUTME: TUI state types — screens, input buffer, and events from background tasks.
// ABOUTME: Applies bootstrap results and answers only to the view that requested them.

use std::path::PathBuf;

use crate::chat::{AskOutcome, ChatSession, Settlement};
use crate::session::types::{ConversationLog, Message, SessionId};

/// Events sent from spawned tasks to the TUI loop via an mpsc channel.
pub enum AppEvent {
    /// Bootstrap for the chat opened under `ticket` finished.
    Bootstrapped { ticket: u64, session: ChatSession },
    /// An ask settled remotely; still tagged with its origin.
    Answer(AskOutcome),
    /// A new-chat or upload request finished; errors are pre-rendered.
    Created(Result<SessionId, String>),
}

/// What the app loop should do after a key or event.
#[derive(Debug)]
pub enum Action {
    None,
    Quit,
    /// Show home with a freshly read My Chats list.
    Home,
    /// Enter (or re-enter) a session view.
    Open(SessionId),
    NewChat,
    Upload(PathBuf),
    /// Dispatch an accepted question.
    Ask(crate::chat::PendingAsk),
}

/// Home screen sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeMode {
    Browse,
    /// Typing a document path into the input line.
    UploadPath,
}

/// Result of the last home-screen action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
}

/// My Chats plus new-chat / upload controls.
pub struct HomeState {
    pub chats: Vec<SessionId>,
    pub selected: usize,
    pub mode: HomeMode,
    /// Set while a create/upload request is outstanding.
    pub busy: Option<String>,
    pub notice: Option<Notice>,
}

impl HomeState {
    pub fn new(chats: Vec<SessionId>) -> Self {
        Self {
            chats,
            selected: 0,
            mode: HomeMode::Browse,
            busy: None,
            notice: None,
        }
    }

    pub fn selected_chat(&self) -> Option<&SessionId> {
        self.chats.get(self.selected)
    }
}

/// Lifecycle of a chat view.
pub enum ChatPhase {
    /// Bootstrap running; the local snapshot is shown read-only.
    Loading { ticket: u64, preview: ConversationLog },
    Ready(ChatSession),
}

/// One open session.
pub struct ChatView {
    pub id: SessionId,
    pub phase: ChatPhase,
}

impl ChatView {
    /// Messages to display for the current phase.
    pub fn messages(&self) -> &[Message] {
        match &self.phase {
            ChatPhase::Loading { preview, .. } => preview.messages(),
            ChatPhase::Ready(session) => session.log().messages(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ChatPhase::Loading { .. })
    }

    pub fn is_in_flight(&self) -> bool {
        match &self.phase {
            ChatPhase::Ready(session) => session.is_in_flight(),
            ChatPhase::Loading { .. } => false,
        }
    }

    /// Input is accepted only once bootstrap settled and no answer is pending.
    pub fn accepts_input(&self) -> bool {
        !self.is_loading() && !self.is_in_flight()
    }
}

pub enum Screen {
    Home(HomeState),
    Chat(ChatView),
}

/// Full TUI application state.
pub struct TuiState {
    pub screen: Screen,
    pub input: String,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    pub server_url: String,
    next_ticket: u64,
}

impl TuiState {
    /// Start on the home screen.
    pub fn new(server_url: String, chats: Vec<SessionId>) -> Self {
        Self {
            screen: Screen::Home(HomeState::new(chats)),
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            server_url,
            next_ticket: 1,
        }
    }

    /// Switch to a loading chat view for `id`. Returns the ticket its bootstrap must carry.
    pub fn open_chat(&mut self, id: SessionId, preview: ConversationLog) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.screen = Screen::Chat(ChatView {
            id,
            phase: ChatPhase::Loading { ticket, preview },
        });
        self.clear_input();
        self.scroll_offset = 0;
        ticket
    }

    /// Leave whatever is shown for home. Any in-flight ask is abandoned with its view.
    pub fn go_home(&mut self, chats: Vec<SessionId>) {
        let selected = match &self.screen {
            Screen::Chat(view) => chats.iter().position(|c| *c == view.id).unwrap_or(0),
            Screen::Home(home) => home.selected.min(chats.len().saturating_sub(1)),
        };
        let mut home = HomeState::new(chats);
        home.selected = selected;
        self.screen = Screen::Home(home);
        self.clear_input();
        self.scroll_offset = 0;
    }

    pub fn home(&self) -> Option<&HomeState> {
        match &self.screen {
            Screen::Home(home) => Some(home),
            Screen::Chat(_) => None,
        }
    }

    pub fn chat(&self) -> Option<&ChatView> {
        match &self.screen {
            Screen::Chat(view) => Some(view),
            Screen::Home(_) => None,
        }
    }

    /// Apply a background event. Results aimed at a view no longer shown are dropped.
    pub fn apply(&mut self, event: AppEvent) -> Action {
        match event {
            AppEvent::Bootstrapped { ticket, session } => {
                if let Screen::Chat(view) = &mut self.screen {
                    if let ChatPhase::Loading { ticket: current, .. } = view.phase {
                        if current == ticket && view.id == *session.id() {
                            view.phase = ChatPhase::Ready(session);
                            self.scroll_offset = 0;
                            return Action::None;
                        }
                    }
                }
                tracing::debug!(session = %session.id(), "dropping bootstrap for a closed view");
                Action::None
            }
            AppEvent::Answer(outcome) => {
                if let Screen::Chat(ChatView {
                    phase: ChatPhase::Ready(session),
                    ..
                }) = &mut self.screen
                {
                    if session.complete(outcome) != Settlement::Discarded {
                        self.scroll_offset = 0;
                    }
                } else {
                    tracing::debug!(
                        session = %outcome.origin.session,
                        "dropping answer, its chat is no longer open"
                    );
                }
                Action::None
            }
            AppEvent::Created(result) => {
                let Screen::Home(home) = &mut self.screen else {
                    return Action::None;
                };
                home.busy = None;
                match result {
                    Ok(id) => Action::Open(id),
                    Err(e) => {
                        home.notice = Some(Notice::Error(e));
                        Action::None
                    }
                }
            }
        }
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Insert pasted text at the cursor, flattening newlines to spaces.
    pub fn insert_str_at_cursor(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char_at_cursor(if c == '\n' || c == '\r' { ' ' } else { c });
        }
    }

    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }
        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }
        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
