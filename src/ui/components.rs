//! Shared UI components (status bar, help panel, notifications).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

/// Render the bottom status bar with mode, counts and the current selection.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
    };
    let selected = app
        .store
        .selected_user()
        .map(|u| format!("  selected:{}", u.login))
        .unwrap_or_default();
    let more = if app.users.cursor().has_next_page { "  (M: more users)" } else { "" };
    let msg = format!(
        "mode: {mode}  users:{}/{}{selected}{more}  ?: help",
        app.store.users().len(),
        app.store.total_count(),
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Render the keybindings panel from the live keymap.
pub fn render_help_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let sections: [(&str, &[(KeyAction, &str)]); 2] = [
        (
            "General",
            &[
                (KeyAction::StartSearch, "Search"),
                (KeyAction::ToggleSelect, "Select / clear"),
                (KeyAction::LoadMoreRepos, "More repositories"),
                (KeyAction::LoadMoreUsers, "More users"),
                (KeyAction::DismissToast, "Dismiss"),
                (KeyAction::ToggleHelp, "Help"),
                (KeyAction::Quit, "Quit"),
            ],
        ),
        (
            "Navigation",
            &[
                (KeyAction::MoveUp, "Up"),
                (KeyAction::MoveDown, "Down"),
                (KeyAction::PageUp, "Page up"),
                (KeyAction::PageDown, "Page down"),
            ],
        ),
    ];

    let key_style = Style::default().fg(app.theme.accent).add_modifier(Modifier::ITALIC);
    let mut lines: Vec<Line> = Vec::new();
    for (title, entries) in sections {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        )));
        for (action, label) in entries {
            let keys = app.keymap.keys_for(*action);
            if keys.is_empty() {
                continue;
            }
            lines.push(Line::from(vec![
                Span::raw(format!("{label}: ")),
                Span::styled(keys.join(" / "), key_style),
            ]));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "In the search field: Enter submits, Esc leaves.",
        Style::default().fg(app.theme.muted),
    )));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Keybindings")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

/// Stack live notifications in the top-right corner, newest first.
pub fn render_toasts(f: &mut Frame, area: Rect, app: &AppState) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);
    let mut y = area.y + 1;
    for toast in app.toasts.visible() {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect { x, y, width, height: TOAST_HEIGHT };
        let color = app.theme.error;
        let body = vec![
            Line::from(Span::styled(
                toast.title.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(toast.description.clone(), Style::default().fg(app.theme.text))),
        ];
        let p = Paragraph::new(body).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        y += TOAST_HEIGHT;
    }
}
