use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Handle;

use crate::app::dispatch::{Command, Dispatcher};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::config::Settings;
use crate::github::GithubApi;
use crate::ui;

/// Poll interval while something is animating (~60 fps).
const FRAME: Duration = Duration::from_millis(16);
const IDLE: Duration = Duration::from_millis(100);

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: Settings,
    api: Arc<dyn GithubApi>,
    handle: Handle,
) -> Result<()> {
    let mut app = AppState::new(settings);
    let (dispatcher, mut events) = Dispatcher::new(api, handle);

    loop {
        let now = Instant::now();
        while let Ok(ev) = events.try_recv() {
            app.apply_event(ev, now);
        }
        app.toasts.prune(now);
        app.advance_transitions(now);

        terminal.draw(|f| {
            ui::render(f, &mut app, now);
        })?;

        let timeout = if app.is_animating(Instant::now()) { FRAME } else { IDLE };
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let mut commands = Vec::new();
                    if handle_key(&mut app, key, &mut commands) {
                        break;
                    }
                    for cmd in commands {
                        dispatcher.dispatch(cmd);
                    }
                }
            }
        }
    }

    tracing::info!("exiting");
    Ok(())
}

/// Apply one key press. Network work is pushed onto `out`; returns `true` to quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent, out: &mut Vec<Command>) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    match app.input_mode {
        InputMode::Search => {
            match key.code {
                KeyCode::Enter => out.extend(app.submit_search()),
                KeyCode::Esc => app.input_mode = InputMode::Normal,
                // input is frozen while a search runs
                _ if app.store.is_loading() => {}
                KeyCode::Backspace => app.input.pop(),
                KeyCode::Char(c) => app.input.push(c),
                _ => {}
            }
            false
        }
        InputMode::Normal => {
            let Some(action) = app.keymap.resolve(&key) else {
                return false;
            };
            match action {
                KeyAction::Quit => return true,
                KeyAction::StartSearch => app.input_mode = InputMode::Search,
                KeyAction::ToggleSelect => out.extend(app.toggle_highlighted()),
                KeyAction::LoadMoreRepos => out.extend(app.load_more_repos()),
                KeyAction::LoadMoreUsers => out.extend(app.load_more_users()),
                KeyAction::MoveUp => app.move_up(),
                KeyAction::MoveDown => app.move_down(),
                KeyAction::PageUp => app.page_up(),
                KeyAction::PageDown => app.page_down(),
                KeyAction::DismissToast => {
                    if app.toasts.dismiss_latest().is_none() {
                        app.show_help = false;
                    }
                }
                KeyAction::ToggleHelp => app.show_help = !app.show_help,
                KeyAction::Ignore => {}
            }
            false
        }
    }
}
