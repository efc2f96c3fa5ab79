//! File logging. The terminal belongs to the TUI, so logs never go to stdout/stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Normalise a user-supplied level; anything unknown falls back to `info`.
pub fn parse_level(value: &str) -> &'static str {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        "off" | "none" => "off",
        _ => DEFAULT_LOG_LEVEL,
    }
}

/// Install a global subscriber appending to `path`. `RUST_LOG` wins over `level`.
pub fn init(path: &Path, level: &str) -> io::Result<()> {
    let level = parse_level(level);
    if level == "off" {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    tracing::info!(log_file = %path.display(), level, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_normalise() {
        assert_eq!(parse_level("WARNING"), "warn");
        assert_eq!(parse_level("debug"), "debug");
        assert_eq!(parse_level("none"), "off");
        assert_eq!(parse_level("loud"), "info");
    }
}
