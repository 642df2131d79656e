//! Terminal theme detection and color definitions

use std::str::FromStr;

use ratatui::style::Color;

use crate::config::ThemeChoice;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Resolve a configured preference, detecting only for `Auto`
    pub fn resolve(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::detect(),
            ThemeChoice::Dark => Self::Dark,
            ThemeChoice::Light => Self::Light,
        }
    }

    /// Primary text color (titles, labels)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Counter values and section titles
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Separators, axes, unknown publishers
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Axis day labels
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// On-premises badge marker
    pub fn on_premises(self) -> Color {
        match self {
            Self::Dark => Color::Green,
            Self::Light => Color::Indexed(22), // dark green (ANSI 256)
        }
    }

    /// Off-premises badge marker
    pub fn off_premises(self) -> Color {
        match self {
            Self::Dark => Color::Magenta,
            Self::Light => Color::Indexed(90), // dark magenta (ANSI 256)
        }
    }

    /// Color for a registry hex color, muted when absent or unparseable
    pub fn series_color(self, hex: Option<&str>) -> Color {
        hex.and_then(|h| Color::from_str(h).ok())
            .unwrap_or_else(|| self.muted())
    }
}
