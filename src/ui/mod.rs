pub mod components;
pub mod users;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

const HELP_WIDTH: u16 = 38;

/// Draw one frame. `now` is the frame time all animations are sampled at.
pub fn render(f: &mut Frame, app: &mut AppState, now: Instant) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_search_box(f, root[0], app);
    render_field_message(f, root[1], app);

    if app.show_help {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(HELP_WIDTH)])
            .split(root[2]);
        users::render_user_list(f, body[0], app, now);
        components::render_help_panel(f, body[1], app);
    } else {
        users::render_user_list(f, root[2], app, now);
    }

    components::render_status_bar(f, root[3], app);
    components::render_toasts(f, f.area(), app);
}

fn render_search_box(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.input_mode == InputMode::Search;
    let border = if app.input.error.is_some() {
        app.theme.error
    } else if focused {
        app.theme.accent
    } else {
        app.theme.border
    };
    let text = if app.input.text.is_empty() && !focused {
        Line::from(Span::styled("Enter username", Style::default().fg(app.theme.muted)))
    } else {
        Line::from(Span::styled(app.input.text.clone(), Style::default().fg(app.theme.header_fg)))
    };
    let title = if app.store.is_loading() { "Search GitHub users (searching...)" } else { "Search GitHub users" };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    let p = Paragraph::new(text)
        .style(Style::default().bg(app.theme.header_bg))
        .block(block);
    f.render_widget(p, area);

    if focused && inner.width > 0 {
        let typed = u16::try_from(app.input.text.chars().count()).unwrap_or(u16::MAX);
        let x = inner.x.saturating_add(typed.min(inner.width.saturating_sub(1)));
        f.set_cursor_position((x, inner.y));
    }
}

/// Inline validation error, or a short hint for the focused field.
fn render_field_message(f: &mut Frame, area: Rect, app: &AppState) {
    let line = match (&app.input.error, app.input_mode) {
        (Some(err), _) => Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD),
        )),
        (None, InputMode::Search) => Line::from(Span::styled(
            "Enter: search   Esc: results",
            Style::default().fg(app.theme.muted),
        )),
        (None, InputMode::Normal) => Line::from(Span::styled(
            "/: search   Enter: repositories   m: more repositories   q: quit",
            Style::default().fg(app.theme.muted),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}
