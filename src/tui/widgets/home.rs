// ABOUTME: Home widget — renders the My Chats list and the outcome of the last action.
// ABOUTME: The selected chat is highlighted; an empty list shows how to start one.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::{HomeState, Notice};

/// Render the home screen body.
pub fn home_lines(home: &HomeState) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "My Chats",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if home.chats.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No chats yet. Press n for a new chat or u to upload a PDF.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (idx, chat) in home.chats.iter().enumerate() {
        if idx == home.selected {
            lines.push(Line::from(vec![
                Span::styled(
                    "❯ ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    chat.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        } else {
            lines.push(Line::from(Span::raw(format!("  {}", chat))));
        }
    }

    if let Some(busy) = &home.busy {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            busy.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    if let Some(notice) = &home.notice {
        let Notice::Error(text) = notice;
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Error: {}", text),
            Style::default().fg(Color::Red),
        )));
    }

    lines
}
