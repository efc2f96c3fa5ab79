//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only Normal mode goes through the keymap. While the search field has focus, printable
//! keys are text and only Enter/Esc/Backspace are special.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic actions that key combinations can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    /// Focus the search field.
    StartSearch,
    /// Select the highlighted user, or clear the selection if it is already selected.
    ToggleSelect,
    /// Next page of the selected user's repositories.
    LoadMoreRepos,
    /// Next page of search results.
    LoadMoreUsers,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Close the newest notification.
    DismissToast,
    ToggleHelp,
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 12] = [
    KeyAction::Quit,
    KeyAction::StartSearch,
    KeyAction::ToggleSelect,
    KeyAction::LoadMoreRepos,
    KeyAction::LoadMoreUsers,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::PageUp,
    KeyAction::PageDown,
    KeyAction::DismissToast,
    KeyAction::ToggleHelp,
    KeyAction::Ignore,
];

#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('s')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Enter), KeyAction::ToggleSelect);
        bindings.insert((M::NONE, Char(' ')), KeyAction::ToggleSelect);
        bindings.insert((M::NONE, Char('m')), KeyAction::LoadMoreRepos);
        // Shift+m arrives as 'M', with or without the SHIFT flag depending on the terminal
        bindings.insert((M::NONE, Char('M')), KeyAction::LoadMoreUsers);
        bindings.insert((M::SHIFT, Char('M')), KeyAction::LoadMoreUsers);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, KeyCode::PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, KeyCode::PageDown), KeyAction::PageDown);
        bindings.insert((M::NONE, Esc), KeyAction::DismissToast);
        bindings.insert((M::NONE, Char('?')), KeyAction::ToggleHelp);
        bindings.insert((M::SHIFT, Char('?')), KeyAction::ToggleHelp);
        Self { bindings }
    }

    /// Load `path` if present, else an existing `keybinds.conf` in the config dir, else
    /// write the defaults to `path`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::config::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::debug!(path, error = %e, "could not write default keybinds");
        }
        km
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Defaults overlaid with `Action = KeySpec` lines.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for (lhs, rhs) in contents.lines().filter_map(crate::config::parse_kv) {
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# gh-user-search keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Space, Up, Down, PageUp, PageDown, /, m, M, ?\n");
        let names: Vec<&str> = ALL_ACTIONS.iter().map(|a| format_action(*a)).collect();
        let _ = writeln!(buf, "# Actions: {}\n", names.join(", "));

        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| {
                format!("{} = {}", format_action(*action), Self::format_key(*mods, *code))
            })
            .collect();
        lines.sort();
        lines.dedup();
        for line in lines {
            let _ = writeln!(buf, "{line}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted, for the help panel.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Space" => Char(' '),
        "Up" => Up,
        "Down" => Down,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ALL_ACTIONS.iter().copied().find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::ToggleSelect => "ToggleSelect",
        KeyAction::LoadMoreRepos => "LoadMoreRepos",
        KeyAction::LoadMoreUsers => "LoadMoreUsers",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::DismissToast => "DismissToast",
        KeyAction::ToggleHelp => "ToggleHelp",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_resolve() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyCode::Char('/'))), Some(KeyAction::StartSearch));
        assert_eq!(km.resolve(&key(KeyCode::Enter)), Some(KeyAction::ToggleSelect));
        assert_eq!(km.resolve(&key(KeyCode::Char('m'))), Some(KeyAction::LoadMoreRepos));
        assert_eq!(km.resolve(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn config_overrides_and_skips_junk() {
        let km = Keymap::parse("# c\nLoadMoreRepos = l\nQuit = Ctrl+q\nNope = z\nMoveUp = TooLong\n");
        assert_eq!(km.resolve(&key(KeyCode::Char('l'))), Some(KeyAction::LoadMoreRepos));
        assert_eq!(
            km.resolve(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(km.resolve(&key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn keys_for_lists_every_binding() {
        let km = Keymap::default();
        assert_eq!(km.keys_for(KeyAction::MoveDown), vec!["Down".to_string(), "j".to_string()]);
        assert_eq!(km.keys_for(KeyAction::ToggleSelect), vec!["Enter".to_string(), "Space".to_string()]);
    }
}
