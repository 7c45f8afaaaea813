// ABOUTME: Main TUI rendering function — assembles header, body, input, and status bar.
// ABOUTME: Splits the terminal frame into vertical layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::state::{HomeMode, Screen, TuiState};
use crate::tui::widgets::chat::{ChatTone, render_chat_lines};
use crate::tui::widgets::home::home_lines;
use crate::tui::widgets::status::{StatusBarParams, ViewStatus, status_line};

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Body
            Constraint::Length(3), // Input area
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let (title, body_lines, editing, input_title, placeholder, status_view, session, count) =
        match &state.screen {
            Screen::Home(home) => {
                let uploading = home.mode == HomeMode::UploadPath;
                (
                    " docchat".to_string(),
                    home_lines(home),
                    uploading,
                    uploading.then_some(" PDF path (enter to upload, esc to cancel) "),
                    if uploading {
                        ""
                    } else {
                        "press u to upload a document"
                    },
                    ViewStatus::Home,
                    None,
                    0,
                )
            }
            Screen::Chat(view) => {
                let tone = if view.is_loading() {
                    ChatTone::Preview
                } else {
                    ChatTone::Live
                };
                let (input_title, status_view) = if view.is_loading() {
                    (Some(" loading chat... "), ViewStatus::Loading)
                } else if view.is_in_flight() {
                    (Some(" waiting for answer... "), ViewStatus::Waiting)
                } else {
                    (None, ViewStatus::Ready)
                };
                (
                    format!(" docchat · {}", view.id),
                    render_chat_lines(view.messages(), tone, view.is_in_flight()),
                    view.accepts_input(),
                    input_title,
                    "ask a question about your documents",
                    status_view,
                    Some(view.id.to_string()),
                    view.messages().len(),
                )
            }
        };

    // Header
    let header = Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(header), chunks[0]);

    render_body(frame, state, body_lines, chunks[1]);

    // Input area
    let input_chunk = chunks[2];
    let mut input_block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    if let Some(title) = input_title {
        input_block = input_block.title(Span::styled(title, Style::default().fg(Color::DarkGray)));
    }

    let input = if editing && !state.input.is_empty() {
        Paragraph::new(Span::raw(state.input.clone()))
    } else if editing {
        Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(Span::styled(
            placeholder,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        ))
    };
    frame.render_widget(input.block(input_block), input_chunk);

    // Cursor only while the input line accepts text.
    if editing && input_chunk.width > 0 && input_chunk.height > 1 {
        state.clamp_cursor();
        let prefix: String = state.input.chars().take(state.cursor_pos).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str());
        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let cursor_x = input_chunk
            .x
            .saturating_add(visual_col.min(max_visual_col) as u16);
        // +1 for the top border.
        let cursor_y = input_chunk.y.saturating_add(1);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(&StatusBarParams {
        server_url: &state.server_url,
        session: session.as_deref(),
        view: status_view,
        message_count: count,
    });
    frame.render_widget(Paragraph::new(status), chunks[3]);
}

/// Draw the body, keeping the newest lines visible unless the user scrolled up.
fn render_body(frame: &mut Frame, state: &mut TuiState, lines: Vec<Line<'static>>, area: Rect) {
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

    if matches!(state.screen, Screen::Home(_)) {
        frame.render_widget(paragraph, area);
        return;
    }

    // ratatui's own line_count() matches its wrapped rendering exactly.
    let total_lines = paragraph.line_count(area.width) as u16;
    let max_scroll = total_lines.saturating_sub(area.height);

    // Cap scroll_offset so it can't go past the top of the content.
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(paragraph.scroll((scroll, 0)), area);
}
