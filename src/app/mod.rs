//! Application state and entry glue.
//!
//! [`AppState`] owns everything the UI shows: the search field, the selection store, the
//! animated user list and one animated repository panel per user that has been opened.
//! The event loop lives in [`update`] and is re-exported as `run`.

pub mod controller;
pub mod dispatch;
pub mod keymap;
pub mod notify;
pub mod theme;
pub mod update;

use std::collections::HashMap;

use crate::config::{Settings, config_file_write_path};
use crate::github::{Repository, User, UserId};
use crate::reveal::PaginatedReveal;
use crate::search::SearchInput;
use crate::store::SearchStore;

use keymap::Keymap;
use notify::Toasts;
use theme::Theme;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// The search field has focus; printable keys are text.
    Search,
}

pub struct AppState {
    pub settings: Settings,
    pub store: SearchStore,
    /// Top-level result list.
    pub users: PaginatedReveal<User>,
    /// Repository panels keyed by owner; created on first selection.
    pub repos: HashMap<UserId, PaginatedReveal<Repository>>,
    pub input: SearchInput,
    pub input_mode: InputMode,
    /// Cursor row in the user list (not the selection).
    pub highlighted: usize,
    /// First body line on screen; kept in sync by the renderer.
    pub scroll: usize,
    pub rows_per_page: usize,
    pub theme: Theme,
    pub keymap: Keymap,
    pub toasts: Toasts,
    pub show_help: bool,
}

impl AppState {
    /// Build state with theme and keybindings read from (or written to) the config dir.
    pub fn new(settings: Settings) -> Self {
        let theme = Theme::load_or_init(&config_file_write_path("theme.conf"));
        let keymap = Keymap::load_or_init(&config_file_write_path("keybinds.conf"));
        Self::with_parts(settings, theme, keymap)
    }

    /// Build state without touching the filesystem.
    pub fn with_parts(settings: Settings, theme: Theme, keymap: Keymap) -> Self {
        let users = PaginatedReveal::new(settings.user_page_size, settings.transition_config());
        let toasts = Toasts::new(settings.toast);
        Self {
            settings,
            store: SearchStore::default(),
            users,
            repos: HashMap::new(),
            input: SearchInput::default(),
            // the search field is the first thing to fill in
            input_mode: InputMode::Search,
            highlighted: 0,
            scroll: 0,
            rows_per_page: 10,
            theme,
            keymap,
            toasts,
            show_help: false,
        }
    }

    pub fn highlighted_user(&self) -> Option<&User> {
        self.store.users().get(self.highlighted)
    }

    pub fn panel(&self, owner: UserId) -> Option<&PaginatedReveal<Repository>> {
        self.repos.get(&owner)
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
