//! Runtime settings: parse/write `settings.conf` and locate config files.
//!
//! All config files (`settings.conf`, `theme.conf`, `keybinds.conf`) share one format:
//! `key = value` lines, `#` comments, unknown keys ignored. They are looked up in the
//! working directory first and then in the platform config directory.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::github::DEFAULT_API_BASE;
use crate::transition::{DEFAULT_DURATION, DEFAULT_STAGGER, TransitionConfig};

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "gh-user-search";

pub const DEFAULT_USER_PAGE_SIZE: u32 = 5;
pub const DEFAULT_REPO_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TOAST: Duration = Duration::from_millis(4000);

/// Platform config directory for this app, e.g. `~/.config/gh-user-search`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

/// First existing location of `name`: working directory, then [`config_dir`].
pub fn config_file_read_path(name: &str) -> Option<String> {
    let local = PathBuf::from(name);
    if local.exists() {
        return Some(local.to_string_lossy().into_owned());
    }
    let in_dir = config_dir()?.join(name);
    in_dir.exists().then(|| in_dir.to_string_lossy().into_owned())
}

/// Where a default `name` gets written: the config dir when it can be created, else the
/// working directory.
pub fn config_file_write_path(name: &str) -> String {
    match config_dir() {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            dir.join(name).to_string_lossy().into_owned()
        }
        _ => name.to_string(),
    }
}

/// Split a config line into `(key, value)`; `None` for blanks, comments and junk.
pub fn parse_kv(raw_line: &str) -> Option<(&str, &str)> {
    let line = raw_line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, val) = line.split_once('=')?;
    let (key, val) = (key.trim(), val.trim());
    if key.is_empty() || val.is_empty() {
        return None;
    }
    Some((key, val))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    /// Not read from or written to the file; CLI/env only.
    pub token: Option<String>,
    pub user_page_size: u32,
    pub repo_page_size: u32,
    pub transition: Duration,
    pub stagger: Duration,
    pub animations: bool,
    pub toast: Duration,
    pub log_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            user_page_size: DEFAULT_USER_PAGE_SIZE,
            repo_page_size: DEFAULT_REPO_PAGE_SIZE,
            transition: DEFAULT_DURATION,
            stagger: DEFAULT_STAGGER,
            animations: true,
            toast: DEFAULT_TOAST,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn transition_config(&self) -> TransitionConfig {
        TransitionConfig { duration: self.transition, stagger: self.stagger, enabled: self.animations }
    }

    /// Parse settings text; unknown keys and malformed values keep their defaults.
    pub fn parse(contents: &str) -> Self {
        let mut s = Self::default();
        for (key, val) in contents.lines().filter_map(parse_kv) {
            match key {
                "api_base" => s.api_base = val.to_string(),
                "user_page_size" => {
                    if let Some(n) = parse_page_size(val) {
                        s.user_page_size = n;
                    }
                }
                "repo_page_size" => {
                    if let Some(n) = parse_page_size(val) {
                        s.repo_page_size = n;
                    }
                }
                "transition_ms" => {
                    if let Ok(ms) = val.parse::<u64>() {
                        s.transition = Duration::from_millis(ms);
                    }
                }
                "stagger_ms" => {
                    if let Ok(ms) = val.parse::<u64>() {
                        s.stagger = Duration::from_millis(ms);
                    }
                }
                "toast_ms" => {
                    if let Ok(ms) = val.parse::<u64>() {
                        s.toast = Duration::from_millis(ms);
                    }
                }
                "animations" => match val.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => s.animations = true,
                    "false" | "off" | "no" | "0" => s.animations = false,
                    _ => {}
                },
                "log_file" => s.log_file = Some(val.to_string()),
                _ => {}
            }
        }
        s
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# gh-user-search settings\n");
        buf.push_str("# The API token is never stored here; use GITHUB_TOKEN or --token.\n\n");
        let _ = writeln!(buf, "api_base = {}", self.api_base);
        let _ = writeln!(buf, "user_page_size = {}", self.user_page_size);
        let _ = writeln!(buf, "repo_page_size = {}", self.repo_page_size);
        let _ = writeln!(buf, "transition_ms = {}", self.transition.as_millis());
        let _ = writeln!(buf, "stagger_ms = {}", self.stagger.as_millis());
        let _ = writeln!(buf, "toast_ms = {}", self.toast.as_millis());
        let _ = writeln!(buf, "animations = {}", self.animations);
        if let Some(log) = &self.log_file {
            let _ = writeln!(buf, "log_file = {log}");
        }
        std::fs::write(path, buf)
    }

    /// Load `path` if present, else an existing file in the config dir, else write defaults.
    pub fn load_or_init(path: &str) -> Self {
        let existing = if std::path::Path::new(path).exists() {
            Some(path.to_string())
        } else {
            config_file_read_path("settings.conf")
        };
        if let Some(existing) = existing {
            return Self::from_file(&existing).unwrap_or_else(|e| {
                tracing::warn!(path = %existing, error = %e, "unreadable settings; using defaults");
                Self::default()
            });
        }
        let s = Self::default();
        if let Err(e) = s.write_file(path) {
            tracing::debug!(path, error = %e, "could not write default settings");
        }
        s
    }
}

fn parse_page_size(val: &str) -> Option<u32> {
    // GitHub caps per_page at 100
    val.parse::<u32>().ok().filter(|n| (1..=100).contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_ignores_rest() {
        let s = Settings::parse(
            "# comment\napi_base = https://ghe.local/api/v3\nrepo_page_size=20\n\
             transition_ms = 250\nanimations = off\nbogus = 1\nuser_page_size = 0\n",
        );
        assert_eq!(s.api_base, "https://ghe.local/api/v3");
        assert_eq!(s.repo_page_size, 20);
        assert_eq!(s.user_page_size, DEFAULT_USER_PAGE_SIZE);
        assert_eq!(s.transition, Duration::from_millis(250));
        assert!(!s.animations);
        assert!(!s.transition_config().enabled);
    }

    #[test]
    fn parse_kv_skips_blank_and_comment_lines() {
        assert_eq!(parse_kv("  # x = y"), None);
        assert_eq!(parse_kv(""), None);
        assert_eq!(parse_kv("key ="), None);
        assert_eq!(parse_kv(" a = b = c "), Some(("a", "b = c")));
    }

    #[test]
    fn missing_settings_file_is_an_io_error() {
        let err = Settings::from_file("/nonexistent/gh-user-search/settings.conf").unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.user_page_size, 5);
        assert_eq!(s.repo_page_size, 10);
        assert_eq!(s.transition, Duration::from_millis(400));
        assert_eq!(s.stagger, Duration::from_millis(80));
    }
}
