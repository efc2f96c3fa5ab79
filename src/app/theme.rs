//! Colour palette, loaded from and written to `theme.conf`.

use ratatui::style::Color;

use crate::config::parse_kv;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    /// Selected user and repository cards.
    pub accent: Color,
    /// Language badge.
    pub badge_fg: Color,
    pub badge_bg: Color,
    pub error: Color,
}

impl Theme {
    /// Default warm palette (amber cards, blue language badges).
    pub fn amber() -> Self {
        Self {
            text: Color::Rgb(0xe5, 0xe5, 0xe5),
            muted: Color::Rgb(0x8a, 0x8a, 0x8a),
            title: Color::Rgb(0xfc, 0xd3, 0x4d),        // amber-300
            border: Color::Rgb(0xfb, 0xbf, 0x24),       // amber-400
            header_bg: Color::Rgb(0x1c, 0x19, 0x17),
            header_fg: Color::Rgb(0xfd, 0xe6, 0x8a),    // amber-200
            status_bg: Color::Rgb(0x45, 0x1a, 0x03),    // amber-950
            status_fg: Color::Rgb(0xfd, 0xe6, 0x8a),
            highlight_fg: Color::Rgb(0x1c, 0x19, 0x17),
            highlight_bg: Color::Rgb(0xfc, 0xd3, 0x4d),
            accent: Color::Rgb(0xf5, 0x9e, 0x0b),       // amber-500
            badge_fg: Color::Rgb(0x1e, 0x40, 0xaf),     // blue-800
            badge_bg: Color::Rgb(0x93, 0xc5, 0xfd),     // blue-300
            error: Color::Rgb(0xef, 0x44, 0x44),
        }
    }

    /// Overlay `key = color` lines on [`Theme::amber`].
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::amber();
        for (key, val) in contents.lines().filter_map(parse_kv) {
            let Some(color) = parse_color(val) else { continue };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "accent" => theme.accent = color,
                "badge_fg" => theme.badge_fg = color,
                "badge_bg" => theme.badge_bg = color,
                "error" => theme.error = color,
                _ => {}
            }
        }
        theme
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# gh-user-search theme\n");
        buf.push_str("# Colors: #RRGGBB, RRGGBB, or 'reset'\n\n");
        for (k, v) in self.entries() {
            let _ = writeln!(buf, "{} = {}", k, color_to_str(v));
        }
        std::fs::write(path, buf)
    }

    /// Load `path`, else `theme.conf` from the config dir, else write and use the default.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::amber);
        }
        if let Some(existing) = crate::config::config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::amber);
        }
        let t = Self::amber();
        if let Err(e) = t.write_file(path) {
            tracing::debug!(path, error = %e, "could not write default theme");
        }
        t
    }

    fn entries(&self) -> [(&'static str, Color); 14] {
        [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("accent", self.accent),
            ("badge_fg", self.badge_fg),
            ("badge_bg", self.badge_bg),
            ("error", self.error),
        ]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::amber()
    }
}

/// Hex (`#RRGGBB` / `RRGGBB`) or `reset`.
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        // parse_color only yields Rgb or Reset
        _ => "reset".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_reset() {
        assert_eq!(parse_color("#FF8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_color("Reset"), Some(Color::Reset));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("zzzzzz"), None);
    }

    #[test]
    fn overlay_keeps_unlisted_defaults() {
        let t = Theme::parse("accent = #010203\nnonsense = #000000\ntitle = nope\n");
        assert_eq!(t.accent, Color::Rgb(1, 2, 3));
        assert_eq!(t.title, Theme::amber().title);
    }
}
