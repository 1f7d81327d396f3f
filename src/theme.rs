use std::sync::OnceLock;

use class_reminder::config::ThemeSettings;
use ratatui::style::{Color, Modifier, Style};

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from config. Only the first call has an effect.
pub fn init(settings: &ThemeSettings) {
    let _ = THEME.set(Theme::from_settings(settings));
}

/// The active theme, or the default one if [`init`] was never called.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    pub accent: Color,
    pub alert: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            accent: Color::Green,
            alert: Color::Yellow,
        }
    }
}

impl Theme {
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    fn dracula() -> Self {
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Rgb(189, 147, 249)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)),
            header: Style::default().fg(Color::Rgb(248, 248, 242)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(Color::Rgb(68, 71, 90)),
            status: Style::default()
                .fg(Color::Rgb(248, 248, 242))
                .bg(Color::Rgb(68, 71, 90)),
            highlight: Style::default()
                .bg(Color::Rgb(68, 71, 90))
                .add_modifier(Modifier::BOLD),
            accent: Color::Rgb(80, 250, 123),
            alert: Color::Rgb(241, 250, 140),
        }
    }

    fn gruvbox() -> Self {
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Rgb(250, 189, 47)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(131, 165, 152)),
            header: Style::default().fg(Color::Rgb(235, 219, 178)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(146, 131, 116)),
            border: Style::default().fg(Color::Rgb(102, 92, 84)),
            status: Style::default()
                .fg(Color::Rgb(235, 219, 178))
                .bg(Color::Rgb(80, 73, 69)),
            highlight: Style::default()
                .bg(Color::Rgb(80, 73, 69))
                .add_modifier(Modifier::BOLD),
            accent: Color::Rgb(184, 187, 38),
            alert: Color::Rgb(254, 128, 25),
        }
    }

    fn nord() -> Self {
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)),
            header: Style::default().fg(Color::Rgb(229, 233, 240)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(Color::Rgb(67, 76, 94)),
            status: Style::default()
                .fg(Color::Rgb(229, 233, 240))
                .bg(Color::Rgb(67, 76, 94)),
            highlight: Style::default()
                .bg(Color::Rgb(67, 76, 94))
                .add_modifier(Modifier::BOLD),
            accent: Color::Rgb(163, 190, 140),
            alert: Color::Rgb(208, 135, 112),
        }
    }

    /// Start from the preset, then apply individual color overrides.
    pub fn from_settings(settings: &ThemeSettings) -> Self {
        let mut theme = settings
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        let color = |v: &Option<String>| v.as_deref().and_then(parse_color);

        if let Some(c) = color(&settings.today_fg) {
            theme.today = theme.today.fg(c);
        }
        if let Some(c) = color(&settings.today_bg) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = color(&settings.selected_fg) {
            theme.selected = theme.selected.fg(c);
        }
        if let Some(c) = color(&settings.selected_bg) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = color(&settings.header_fg) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = color(&settings.dim_fg) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = color(&settings.border_fg) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = color(&settings.status_fg) {
            theme.status = theme.status.fg(c);
        }
        if let Some(c) = color(&settings.status_bg) {
            theme.status = theme.status.bg(c);
        }
        if let Some(c) = color(&settings.highlight_bg) {
            theme.highlight = theme.highlight.bg(c);
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#').filter(|h| h.len() == 6) {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
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
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_named_colors() {
        assert_eq!(parse_color("#ff8800"), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(parse_color(" Grey "), Some(Color::Gray));
        assert_eq!(parse_color("#ff88"), None);
        assert_eq!(parse_color("mauve"), None);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let settings = ThemeSettings {
            preset: Some("nord".into()),
            today_bg: Some("red".into()),
            ..Default::default()
        };
        let theme = Theme::from_settings(&settings);
        assert_eq!(theme.today.bg, Some(Color::Red));
        assert_eq!(theme.selected, Theme::nord().selected);
    }
}
