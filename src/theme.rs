//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Colours for the playfield and sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Landed and falling blocks.
    pub block: Color,
    /// Playfield background.
    pub bg: Color,
    /// Borders.
    pub div_line: Color,
    /// Text (score, help).
    pub main_fg: Color,
    /// Titles and labels.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

const BLOCK: Color = Color::Rgb(0x61, 0xAF, 0xEF);
const BG: Color = Color::Rgb(0x31, 0x35, 0x3F);
const DIV_LINE: Color = Color::Rgb(0x3F, 0x44, 0x4F);
const MAIN_FG: Color = Color::Rgb(0xAB, 0xB2, 0xBF);
const TITLE: Color = Color::Rgb(0xE5, 0xC0, 0x7B);

impl Theme {
    /// One Dark defaults.
    pub const fn onedark_default() -> Self {
        Self {
            block: BLOCK,
            bg: BG,
            div_line: DIV_LINE,
            main_fg: MAIN_FG,
            title: TITLE,
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default()),
        };
        let s = std::fs::read_to_string(path)?;
        Ok(Self::from_map(&parse_theme_file(&s)))
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        Self {
            block: get("cpu_box").or_else(|| get("hi_fg")).unwrap_or(BLOCK),
            bg: get("meter_bg").unwrap_or(BG),
            div_line: get("div_line").unwrap_or(DIV_LINE),
            main_fg: get("main_fg").unwrap_or(MAIN_FG),
            title: get("title").unwrap_or(TITLE),
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    let (r, g, b) = match s.len() {
        6 => (channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?),
        3 => (
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        ),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}
