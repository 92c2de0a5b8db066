use ratatui::{prelude::*, widgets::Gauge};

use crate::core::config::ThemeMode;

/// Colors for one render pass, derived from the theme mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub cpu_line: Color,
    pub memory_line: Color,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                background: Color::Reset,
                foreground: Color::Reset,
                muted: Color::DarkGray,
                accent: Color::Blue,
                selected_bg: Color::LightBlue,
                selected_fg: Color::Black,
                cpu_line: Color::Blue,
                memory_line: Color::Magenta,
            },
            ThemeMode::Dark => Self {
                background: Color::Black,
                foreground: Color::White,
                muted: Color::Gray,
                accent: Color::Cyan,
                selected_bg: Color::DarkGray,
                selected_fg: Color::White,
                cpu_line: Color::Cyan,
                memory_line: Color::LightMagenta,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }
}

/// Color for a 0-100 usage value
pub fn usage_color(value: f64) -> Color {
    match value {
        v if v < 50.0 => Color::Cyan,
        v if v < 75.0 => Color::LightYellow,
        v if v < 90.0 => Color::LightRed,
        _ => Color::Red,
    }
}

/// Create a gauge with color based on value thresholds
pub fn colored_gauge<'a>(value: f64, label: &'a str, theme: &Theme) -> Gauge<'a> {
    Gauge::default()
        .gauge_style(Style::default().fg(usage_color(value)).bg(theme.background))
        .ratio((value / 100.0).clamp(0.0, 1.0))
        .label(label)
}
