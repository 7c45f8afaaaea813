// ABOUTME: Chat widget — renders conversation messages into styled ratatui Lines.
// ABOUTME: User and assistant turns get distinct prefixes; citations follow the answer they back.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::types::{Message, Role};

/// How the message list should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTone {
    /// Settled, interactive log.
    Live,
    /// Local snapshot shown while the session is still loading.
    Preview,
}

/// Render a slice of messages into styled Lines for display.
///
/// `pending` appends a waiting indicator after the last message.
pub fn render_chat_lines(messages: &[Message], tone: ChatTone, pending: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        match msg.role {
            Role::User => {
                lines.push(Line::from(vec![
                    Span::styled("❯ ", prefix_style(Color::Green, tone)),
                    Span::styled(msg.content.clone(), body_style(tone)),
                ]));
            }
            Role::Assistant => {
                // First line gets the prefix, subsequent lines are plain.
                for (i, text) in msg.content.split('\n').enumerate() {
                    if i == 0 {
                        lines.push(Line::from(vec![
                            Span::styled("⏺ ", prefix_style(Color::Cyan, tone)),
                            Span::styled(text.to_string(), body_style(tone)),
                        ]));
                    } else {
                        lines.push(Line::from(Span::styled(text.to_string(), body_style(tone))));
                    }
                }
                lines.extend(citation_lines(msg.citations()));
            }
        }
    }

    if pending {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "⏺ waiting for answer...",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn citation_lines(sources: &[String]) -> Vec<Line<'static>> {
    if sources.is_empty() {
        return Vec::new();
    }
    let style = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled("  Citations:", style))];
    lines.extend(
        sources
            .iter()
            .map(|source| Line::from(Span::styled(format!("    • {}", source), style))),
    );
    lines
}

fn prefix_style(color: Color, tone: ChatTone) -> Style {
    match tone {
        ChatTone::Live => Style::default().fg(color).add_modifier(Modifier::BOLD),
        ChatTone::Preview => Style::default().fg(Color::DarkGray),
    }
}

fn body_style(tone: ChatTone) -> Style {
    match tone {
        ChatTone::Live => Style::default(),
        ChatTone::Preview => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
    }
}
