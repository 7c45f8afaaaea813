// ABOUTME: Status bar widget — renders server, current view, and request state.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary with key hints.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// What the status bar reports about the visible screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Home,
    Loading,
    Ready,
    Waiting,
}

/// Inputs needed to render the status bar.
pub struct StatusBarParams<'a> {
    pub server_url: &'a str,
    /// Session shown, if any.
    pub session: Option<&'a str>,
    pub view: ViewStatus,
    pub message_count: usize,
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams<'_>) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![Span::styled(
        format!(" {} ", params.server_url),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(session) = params.session {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            format!("chat {} ", session),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            format!("{} ", message_count_label(params.message_count)),
            Style::default().fg(Color::White),
        ));
    }

    let (label, color) = match params.view {
        ViewStatus::Home => ("enter open · n new · u upload · q quit ", Color::DarkGray),
        ViewStatus::Loading => ("loading... ", Color::Yellow),
        ViewStatus::Ready => ("esc home · ctrl+r reload ", Color::DarkGray),
        ViewStatus::Waiting => ("waiting for answer... ", Color::Yellow),
    };
    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(label, Style::default().fg(color)));

    Line::from(spans)
}

/// "1 message", "3 messages".
pub fn message_count_label(count: usize) -> String {
    if count == 1 {
        "1 message".to_string()
    } else {
        format!("{} messages", count)
    }
}
