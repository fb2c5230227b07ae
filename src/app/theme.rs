//! Color palette and its `theme.conf` file format.
//!
//! The file is `key = value` lines; values are `#RRGGBB`, `RRGGBB` or `reset`.
//! Unknown keys and unparsable colors are ignored.

use std::fmt::Write as _;
use std::path::Path;

use ratatui::style::Color;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Plain terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error: Color::Red,
            success: Color::Green,
        }
    }

    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
            success: Color::Rgb(0xa6, 0xe3, 0xa1),
        }
    }

    fn slots(&mut self) -> [(&'static str, &mut Color); 11] {
        [
            ("text", &mut self.text),
            ("muted", &mut self.muted),
            ("title", &mut self.title),
            ("border", &mut self.border),
            ("header_fg", &mut self.header_fg),
            ("status_bg", &mut self.status_bg),
            ("status_fg", &mut self.status_fg),
            ("highlight_fg", &mut self.highlight_fg),
            ("highlight_bg", &mut self.highlight_bg),
            ("error", &mut self.error),
            ("success", &mut self.success),
        ]
    }

    /// Parse theme file contents on top of `mocha`.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let (key, val) = (key.trim(), val.trim());
            let Some(color) = parse_color(val) else { continue };
            if let Some((_, slot)) = theme.slots().into_iter().find(|(k, _)| *k == key) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        std::fs::read_to_string(path).ok().map(|c| Self::parse(&c))
    }

    pub fn to_config(&self) -> String {
        let mut copy = *self;
        let mut buf = String::new();
        buf.push_str("# admin-console theme\n");
        buf.push_str("# Colors: #RRGGBB, RRGGBB or 'reset'\n\n");
        for (key, color) in copy.slots() {
            let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(*color));
        }
        buf
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_config())
    }

    /// Load `path`, or write the default theme there and use it.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let theme = Self::default();
        if let Err(e) = theme.write_file(path) {
            warn!(path = %path.display(), error = %e, "could not write default theme");
        }
        theme
    }
}

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
        Color::Reset => "reset".to_string(),
        Color::Black => "#000000".to_string(),
        Color::Red => "#FF0000".to_string(),
        Color::Green => "#00FF00".to_string(),
        Color::Yellow => "#FFFF00".to_string(),
        Color::Cyan => "#00FFFF".to_string(),
        Color::Gray => "#B3B3B3".to_string(),
        Color::DarkGray => "#4D4D4D".to_string(),
        Color::White => "#FFFFFF".to_string(),
        // Remaining named/indexed colors have no stable hex form.
        _ => "reset".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overrides_known_keys_only() {
        let t = Theme::parse("# comment\ntitle = #010203\nbogus = #ffffff\nerror=reset\nborder = nothex\nmuted = aé€\n");
        assert_eq!(t.title, Color::Rgb(1, 2, 3));
        assert_eq!(t.error, Color::Reset);
        assert_eq!(t.border, Theme::mocha().border);
        // Six bytes but not six hex digits.
        assert_eq!(t.muted, Theme::mocha().muted);
    }

    #[test]
    fn config_text_parses_back() {
        let t = Theme::mocha();
        assert_eq!(Theme::parse(&t.to_config()), t);
    }
}
