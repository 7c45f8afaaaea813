// ABOUTME: Keyboard input handling for the TUI — translates key events into actions.
// ABOUTME: Home navigation, upload path entry, and chat composing with send gating.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::state::{Action, ChatPhase, ChatView, HomeMode, Notice, Screen, TuiState};

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    let home_mode = state.home().map(|home| home.mode);
    match home_mode {
        Some(HomeMode::UploadPath) => handle_upload_path_key(state, key),
        Some(HomeMode::Browse) => handle_home_key(state, key),
        None => handle_chat_key(state, key),
    }
}

/// Insert pasted text wherever the input line is currently editable.
pub fn handle_paste(state: &mut TuiState, text: &str) {
    let editable = match &state.screen {
        Screen::Home(home) => home.mode == HomeMode::UploadPath,
        Screen::Chat(view) => view.accepts_input(),
    };
    if editable {
        state.insert_str_at_cursor(text);
    }
}

fn handle_home_key(state: &mut TuiState, key: KeyEvent) -> Action {
    let Screen::Home(home) = &mut state.screen else {
        return Action::None;
    };

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Up => {
            home.selected = home.selected.saturating_sub(1);
            Action::None
        }
        KeyCode::Down => {
            if home.selected + 1 < home.chats.len() {
                home.selected += 1;
            }
            Action::None
        }
        KeyCode::Enter => match home.selected_chat() {
            Some(id) => Action::Open(id.clone()),
            None => Action::None,
        },
        KeyCode::Char('n') if home.busy.is_none() => {
            home.busy = Some("Creating chat...".to_string());
            home.notice = None;
            Action::NewChat
        }
        KeyCode::Char('u') if home.busy.is_none() => {
            home.mode = HomeMode::UploadPath;
            home.notice = None;
            state.clear_input();
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_upload_path_key(state: &mut TuiState, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => {
            if let Screen::Home(home) = &mut state.screen {
                home.mode = HomeMode::Browse;
            }
            state.clear_input();
            Action::None
        }
        KeyCode::Enter => {
            let path = state.input.trim().to_string();
            let Screen::Home(home) = &mut state.screen else {
                return Action::None;
            };
            if path.is_empty() {
                home.notice = Some(Notice::Error("Enter a path to a PDF file".to_string()));
                return Action::None;
            }
            home.mode = HomeMode::Browse;
            home.busy = Some("Uploading...".to_string());
            home.notice = None;
            state.clear_input();
            Action::Upload(PathBuf::from(path))
        }
        _ => {
            edit_input(state, key);
            Action::None
        }
    }
}

fn handle_chat_key(state: &mut TuiState, key: KeyEvent) -> Action {
    // Scrolling works in every chat phase.
    match key.code {
        KeyCode::Esc => return Action::Home,
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
            return Action::None;
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
            return Action::None;
        }
        KeyCode::Up => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
            return Action::None;
        }
        KeyCode::Down => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
            return Action::None;
        }
        _ => {}
    }

    let Screen::Chat(view) = &mut state.screen else {
        return Action::None;
    };
    if !view.accepts_input() {
        return Action::None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
        return Action::Open(view.id.clone());
    }

    match key.code {
        KeyCode::Enter => {
            let ChatView {
                phase: ChatPhase::Ready(session),
                ..
            } = view
            else {
                return Action::None;
            };
            match session.begin_send(&mut state.input) {
                Some(pending) => {
                    state.cursor_pos = 0;
                    state.scroll_offset = 0;
                    Action::Ask(pending)
                }
                None => Action::None,
            }
        }
        _ => {
            edit_input(state, key);
            Action::None
        }
    }
}

/// Line editing shared by the chat composer and the upload path prompt.
fn edit_input(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.insert_char_at_cursor(c);
        }
        KeyCode::Backspace => state.backspace_char(),
        KeyCode::Delete => state.delete_char_at_cursor(),
        KeyCode::Left => state.move_cursor_left(),
        KeyCode::Right => state.move_cursor_right(),
        KeyCode::Home => state.move_cursor_home(),
        KeyCode::End => state.move_cursor_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::chat::ChatContext;
    use crate::remote::testing::ScriptedService;
    use crate::session::kv::MemoryStore;
    use crate::session::types::{ConversationLog, Role, SessionId};
    use crate::tui::state::AppEvent;

    fn id(raw: &str) -> SessionId {
        SessionId::parse(raw).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut TuiState, text: &str) {
        for c in text.chars() {
            handle_key(state, key(KeyCode::Char(c)));
        }
    }

    async fn ready_chat() -> TuiState {
        let ctx = ChatContext::new(Arc::new(MemoryStore::new()), Arc::new(ScriptedService::new()));
        let mut state = TuiState::new(String::new(), vec![]);
        let ticket = state.open_chat(id("s"), ConversationLog::new());
        let session = ctx.open(id("s")).await;
        state.apply(AppEvent::Bootstrapped { ticket, session });
        state
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut state = TuiState::new(String::new(), vec![]);
        let action = handle_key(&mut state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(action, Action::Quit));
    }

    #[test]
    fn home_navigation_and_open() {
        let mut state = TuiState::new(String::new(), vec![id("a"), id("b")]);
        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(state.home().unwrap().selected, 1);
        handle_key(&mut state, key(KeyCode::Up));
        handle_key(&mut state, key(KeyCode::Up));
        assert_eq!(state.home().unwrap().selected, 0);

        let action = handle_key(&mut state, key(KeyCode::Enter));
        assert!(matches!(action, Action::Open(ref opened) if *opened == id("a")));
    }

    #[test]
    fn enter_on_empty_home_does_nothing() {
        let mut state = TuiState::new(String::new(), vec![]);
        assert!(matches!(handle_key(&mut state, key(KeyCode::Enter)), Action::None));
    }

    #[test]
    fn new_chat_is_not_requested_twice() {
        let mut state = TuiState::new(String::new(), vec![]);
        assert!(matches!(handle_key(&mut state, key(KeyCode::Char('n'))), Action::NewChat));
        assert!(matches!(handle_key(&mut state, key(KeyCode::Char('n'))), Action::None));
    }

    #[test]
    fn upload_prompt_collects_path() {
        let mut state = TuiState::new(String::new(), vec![]);
        handle_key(&mut state, key(KeyCode::Char('u')));
        assert_eq!(state.home().unwrap().mode, HomeMode::UploadPath);

        // 'q' is text here, not quit.
        type_text(&mut state, "/tmp/q.pdf");
        let action = handle_key(&mut state, key(KeyCode::Enter));
        assert!(matches!(action, Action::Upload(ref p) if p == &PathBuf::from("/tmp/q.pdf")));
        assert_eq!(state.home().unwrap().mode, HomeMode::Browse);
        assert!(state.home().unwrap().busy.is_some());
        assert!(state.input.is_empty());
    }

    #[test]
    fn upload_prompt_escape_cancels() {
        let mut state = TuiState::new(String::new(), vec![]);
        handle_key(&mut state, key(KeyCode::Char('u')));
        type_text(&mut state, "abc");
        handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.home().unwrap().mode, HomeMode::Browse);
        assert!(state.input.is_empty());
    }

    #[test]
    fn typing_is_ignored_while_loading() {
        let mut state = TuiState::new(String::new(), vec![]);
        state.open_chat(id("s"), ConversationLog::new());
        type_text(&mut state, "hello");
        assert!(state.input.is_empty());
        assert!(matches!(handle_key(&mut state, key(KeyCode::Enter)), Action::None));
    }

    #[tokio::test]
    async fn enter_sends_and_disables_input() {
        let mut state = ready_chat().await;
        type_text(&mut state, "What is in chapter 2?");

        let action = handle_key(&mut state, key(KeyCode::Enter));
        let Action::Ask(pending) = action else {
            panic!("expected Ask action");
        };
        assert_eq!(pending.question, "What is in chapter 2?");
        assert!(state.input.is_empty());
        assert_eq!(state.cursor_pos, 0);

        let view = state.chat().unwrap();
        assert!(view.is_in_flight());
        assert_eq!(view.messages().last().unwrap().role, Role::User);

        type_text(&mut state, "more");
        assert!(state.input.is_empty(), "input disabled while waiting");
    }

    #[tokio::test]
    async fn blank_enter_sends_nothing() {
        let mut state = ready_chat().await;
        type_text(&mut state, "   ");
        assert!(matches!(handle_key(&mut state, key(KeyCode::Enter)), Action::None));
        assert!(state.chat().unwrap().messages().is_empty());
        assert_eq!(state.input, "   ");
    }

    #[tokio::test]
    async fn escape_returns_home_and_ctrl_r_reopens() {
        let mut state = ready_chat().await;
        let reload = handle_key(&mut state, KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(matches!(reload, Action::Open(ref opened) if *opened == id("s")));
        assert!(matches!(handle_key(&mut state, key(KeyCode::Esc)), Action::Home));
    }

    #[test]
    fn paste_only_lands_in_editable_input() {
        let mut state = TuiState::new(String::new(), vec![]);
        handle_paste(&mut state, "ignored");
        assert!(state.input.is_empty());

        handle_key(&mut state, key(KeyCode::Char('u')));
        handle_paste(&mut state, "/docs/a.pdf\n");
        assert_eq!(state.input, "/docs/a.pdf ");
    }

    #[tokio::test]
    async fn scroll_keys_adjust_offset() {
        let mut state = ready_chat().await;
        handle_key(&mut state, key(KeyCode::PageUp));
        assert_eq!(state.scroll_offset, 10);
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(state.scroll_offset, 9);
        handle_key(&mut state, key(KeyCode::PageDown));
        assert_eq!(state.scroll_offset, 0);
    }
}
