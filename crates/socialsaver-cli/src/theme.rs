use ratatui::style::Color;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashTheme {
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub border_fg: Color,
    pub help_fg: Color,
    /// Marker color for items not yet opened
    pub unseen_fg: Color,
    pub error_fg: Color,
}

impl Default for DashTheme {
    fn default() -> Self {
        Self {
            highlight_fg: Color::Black,
            highlight_bg: Color::Cyan,
            border_fg: Color::Gray,
            help_fg: Color::Yellow,
            unseen_fg: Color::Green,
            error_fg: Color::Red,
        }
    }
}

#[derive(Deserialize, Default)]
struct RawTheme {
    highlight_fg: Option<String>,
    highlight_bg: Option<String>,
    border_fg: Option<String>,
    help_fg: Option<String>,
    unseen_fg: Option<String>,
    error_fg: Option<String>,
}

/// Resolves the theme file: an absolute override, a name under the config
/// dir, or `dashboard_theme.toml`.
pub fn theme_path(name: Option<&str>) -> PathBuf {
    let dir = crate::config::config_dir();
    match name {
        Some(n) if Path::new(n).is_absolute() => PathBuf::from(n),
        Some(n) if n.ends_with(".toml") => dir.join(n),
        Some(n) => dir.join(format!("{n}.toml")),
        None => dir.join("dashboard_theme.toml"),
    }
}

pub fn load_dash_theme(name: Option<&str>) -> DashTheme {
    let path = theme_path(name);
    match std::fs::read_to_string(&path) {
        Ok(s) => parse_theme(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable theme");
            DashTheme::default()
        }),
        Err(_) => DashTheme::default(),
    }
}

pub fn parse_theme(s: &str) -> Result<DashTheme, toml::de::Error> {
    let raw: RawTheme = toml::from_str(s)?;
    let d = DashTheme::default();
    let pick = |v: Option<String>, fallback: Color| v.and_then(parse_color).unwrap_or(fallback);
    Ok(DashTheme {
        highlight_fg: pick(raw.highlight_fg, d.highlight_fg),
        highlight_bg: pick(raw.highlight_bg, d.highlight_bg),
        border_fg: pick(raw.border_fg, d.border_fg),
        help_fg: pick(raw.help_fg, d.help_fg),
        unseen_fg: pick(raw.unseen_fg, d.unseen_fg),
        error_fg: pick(raw.error_fg, d.error_fg),
    })
}

pub fn parse_color(s: String) -> Option<Color> {
    parse_color_str(&s)
}

fn parse_color_str(s: &str) -> Option<Color> {
    let k = s.trim().to_ascii_lowercase();
    match k.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => {
            if let Some(hex) = k.strip_prefix('#') {
                return parse_hex(hex);
            }
            if let Some(rest) = k.strip_prefix("rgb(") {
                return parse_rgb_tuple(rest);
            }
            None
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn parse_rgb_tuple(rest: &str) -> Option<Color> {
    let t = rest.strip_suffix(')')?;
    let parts: Vec<_> = t.split(',').map(|p| p.trim()).collect();
    if parts.len() != 3 {
        return None;
    }
    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;
    Some(Color::Rgb(r, g, b))
}
