use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;
use crate::app::controller::{panel_height, user_list_rows};
use crate::app::theme::Theme;
use crate::github::{AccountKind, Repository, User};
use crate::reveal::PaginatedReveal;

const PANEL_INDENT: &str = "    ";

/// Apply stagger visibility: hidden items keep their row but draw nothing, fading ones are dim.
fn fade(line: Line<'static>, visibility: f32) -> Line<'static> {
    if visibility <= 0.0 {
        Line::raw("")
    } else if visibility < 1.0 {
        line.patch_style(Style::default().add_modifier(Modifier::DIM))
    } else {
        line
    }
}

fn user_line(user: &User, highlighted: bool, selected: bool, theme: &Theme) -> Line<'static> {
    let marker = if selected { "▾ " } else { "▸ " };
    let login_style = if selected {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme.accent)),
        Span::styled(user.login.clone(), login_style),
    ];
    match user.kind {
        AccountKind::Organization => spans.push(Span::styled(" (org)", Style::default().fg(theme.muted))),
        AccountKind::Bot => spans.push(Span::styled(" (bot)", Style::default().fg(theme.muted))),
        AccountKind::User | AccountKind::Other => {}
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(user.html_url.clone(), Style::default().fg(theme.muted)));

    let line = Line::from(spans);
    if highlighted {
        line.style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg))
    } else {
        line
    }
}

fn repo_card(repo: &Repository, theme: &Theme) -> [Line<'static>; 3] {
    let mut title = vec![
        Span::raw(PANEL_INDENT),
        Span::styled("■ ", Style::default().fg(theme.accent)),
        Span::styled(repo.name.clone(), Style::default().fg(theme.title).add_modifier(Modifier::BOLD)),
    ];
    if let Some(lang) = &repo.language {
        title.push(Span::raw(" "));
        title.push(Span::styled(
            format!(" {lang} "),
            Style::default().fg(theme.badge_fg).bg(theme.badge_bg),
        ));
    }
    if repo.stargazers_count > 0 {
        title.push(Span::styled(
            format!("  ★ {}", repo.stargazers_count),
            Style::default().fg(theme.muted),
        ));
    }
    if repo.forks_count > 0 {
        title.push(Span::styled(format!("  ⑂ {}", repo.forks_count), Style::default().fg(theme.muted)));
    }

    let description = repo
        .description
        .clone()
        .unwrap_or_else(|| "No description available".to_string());
    [
        Line::from(title),
        Line::from(vec![
            Span::raw(PANEL_INDENT),
            Span::raw("  "),
            Span::styled(description, Style::default().fg(theme.text)),
        ]),
        Line::from(vec![
            Span::raw(PANEL_INDENT),
            Span::raw("  "),
            Span::styled(
                repo.html_url.clone(),
                Style::default().fg(theme.muted).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
    ]
}

fn repo_summary(count: usize, login: &str) -> String {
    let noun = if count == 1 { "repository" } else { "repositories" };
    format!("Found {count} {noun} for {login}.")
}

/// Lines of one repository panel, clipped to its animated height.
fn panel_lines(
    panel: &PaginatedReveal<Repository>,
    login: &str,
    theme: &Theme,
    now: Instant,
) -> Vec<Line<'static>> {
    let content = panel.displayed();
    if !content.active {
        return Vec::new();
    }
    let loading = panel.is_loading();
    let summary = if content.items.is_empty() && loading {
        "Loading Repositories...".to_string()
    } else if content.items.is_empty() {
        "No repositories found.".to_string()
    } else {
        repo_summary(content.items.len(), login)
    };
    let mut lines = vec![Line::from(vec![
        Span::raw(PANEL_INDENT),
        Span::styled(summary, Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC)),
    ])];

    let seq = panel.sequencer();
    for (i, repo) in content.items.iter().enumerate() {
        let visibility = seq.item_visibility(i, now);
        lines.extend(repo_card(repo, theme).into_iter().map(|l| fade(l, visibility)));
    }
    if content.cursor.has_next_page {
        let label = if loading { "Loading more..." } else { "[m] Load more" };
        lines.push(Line::from(vec![
            Span::raw(PANEL_INDENT),
            Span::styled(label, Style::default().fg(theme.accent)),
        ]));
    }
    lines.truncate(usize::from(panel_height(panel)));
    lines
}

/// Build the body lines and the index of the highlighted user's row.
fn list_lines(app: &AppState, now: Instant) -> (Vec<Line<'static>>, usize) {
    let theme = &app.theme;
    let content = app.users.displayed();
    if !content.active {
        let hint = Line::styled(
            "Type a GitHub username and press Enter to search.",
            Style::default().fg(theme.muted),
        );
        return (vec![hint], 0);
    }
    if content.items.is_empty() {
        let text = if app.store.is_loading() { "Loading users..." } else { "No users found" };
        return (vec![Line::styled(text, Style::default().fg(theme.muted))], 0);
    }

    let seq = app.users.sequencer();
    let mut lines = Vec::new();
    let mut highlighted_line = 0;
    for (i, user) in content.items.iter().enumerate() {
        if i == app.highlighted {
            highlighted_line = lines.len();
        }
        let row = user_line(user, i == app.highlighted, app.store.is_selected(user.id), theme);
        lines.push(fade(row, seq.item_visibility(i, now)));
        if let Some(panel) = app.panel(user.id) {
            lines.extend(panel_lines(panel, &user.login, theme, now));
        }
    }
    let height = seq.visible_height(user_list_rows(content, &app.repos));
    lines.truncate(usize::from(height));
    (lines, highlighted_line)
}

fn list_title(app: &AppState) -> String {
    let shown = app.store.users().len();
    if app.store.is_loading() {
        "Loading users...".to_string()
    } else if shown == 0 {
        "Users".to_string()
    } else {
        format!("Showing {} users (of {})", shown, app.store.total_count())
    }
}

/// Render the animated user list with nested repository panels.
pub fn render_user_list(f: &mut Frame, area: Rect, app: &mut AppState, now: Instant) {
    let block = Block::default()
        .title(list_title(app))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    let body_height = usize::from(inner.height).max(1);
    app.rows_per_page = body_height;

    let (lines, highlighted_line) = list_lines(app, now);
    if highlighted_line < app.scroll {
        app.scroll = highlighted_line;
    } else if highlighted_line >= app.scroll + body_height {
        app.scroll = highlighted_line + 1 - body_height;
    }
    app.scroll = app.scroll.min(lines.len().saturating_sub(1));

    let offset = u16::try_from(app.scroll).unwrap_or(u16::MAX);
    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .scroll((offset, 0))
        .block(block);
    f.render_widget(p, area);
}
