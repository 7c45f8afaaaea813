// ABOUTME: App orchestrator — drives the ratatui event loop over terminal input and background tasks.
// ABOUTME: Turns TUI actions into spawned bootstrap, ask, and create requests against ChatContext.

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind,
};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::chat::ChatContext;
use crate::session::types::SessionId;
use crate::tui::input::{handle_key, handle_paste};
use crate::tui::state::{Action, AppEvent, TuiState};
use crate::tui::ui;

/// Top-level interactive application.
pub struct App {
    ctx: ChatContext,
    server_url: String,
    initial: Option<SessionId>,
}

impl App {
    /// `initial` opens that session straight away instead of showing home.
    pub fn new(ctx: ChatContext, server_url: String, initial: Option<SessionId>) -> Self {
        Self {
            ctx,
            server_url,
            initial,
        }
    }

    /// Run the TUI until the user quits.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut terminal = ratatui::init();
        crossterm::execute!(std::io::stdout(), EnableBracketedPaste)?;

        let result = self.event_loop(&mut terminal).await;

        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
        ratatui::restore();
        result
    }

    async fn event_loop(&self, terminal: &mut ratatui::DefaultTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppEvent>(64);
        let mut events = EventStream::new();
        let mut state = TuiState::new(self.server_url.clone(), self.ctx.visited());

        if let Some(id) = self.initial.clone() {
            self.perform(Action::Open(id), &mut state, &tx);
        }

        loop {
            terminal.draw(|frame| ui::render(frame, &mut state))?;

            let action = tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        handle_key(&mut state, key)
                    }
                    Some(Ok(Event::Paste(text))) => {
                        handle_paste(&mut state, &text);
                        Action::None
                    }
                    Some(Ok(_)) => Action::None,
                    Some(Err(e)) => return Err(e.into()),
                    None => Action::Quit,
                },
                Some(event) = rx.recv() => state.apply(event),
            };

            if self.perform(action, &mut state, &tx) {
                tracing::info!("quitting");
                return Ok(());
            }
        }
    }

    /// Carry out an action. Returns true when the app should exit.
    fn perform(&self, action: Action, state: &mut TuiState, tx: &mpsc::Sender<AppEvent>) -> bool {
        match action {
            Action::None => {}
            Action::Quit => return true,
            Action::Home => state.go_home(self.ctx.visited()),
            Action::Open(id) => {
                let ticket = state.open_chat(id.clone(), self.ctx.preview(&id));
                let ctx = self.ctx.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let session = ctx.open(id).await;
                    let _ = tx.send(AppEvent::Bootstrapped { ticket, session }).await;
                });
            }
            Action::NewChat => {
                let ctx = self.ctx.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = ctx.new_chat().await.map_err(|e| e.to_string());
                    let _ = tx.send(AppEvent::Created(result)).await;
                });
            }
            Action::Upload(path) => {
                let ctx = self.ctx.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = ctx.upload_document(&path).await.map_err(|e| e.to_string());
                    let _ = tx.send(AppEvent::Created(result)).await;
                });
            }
            Action::Ask(pending) => {
                let service = self.ctx.service.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = pending.dispatch(service.as_ref()).await;
                    let _ = tx.send(AppEvent::Answer(outcome)).await;
                });
            }
        }
        false
    }
}
