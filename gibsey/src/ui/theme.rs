//! Color theme and styling for the reader TUI

use gibsey_core::{HexColor, Theme};
use ratatui::style::{Color, Modifier, Style};

/// Terminal color for a catalog color.
pub fn to_color(color: HexColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Reader UI colors, rebuilt from the view theme every frame.
#[derive(Debug, Clone)]
pub struct ReaderTheme {
    /// Active theme color; borders and revealed text use it.
    pub accent: Color,
    pub foreground: Color,
    pub border: Color,
    pub system_text: Color,
}

impl Default for ReaderTheme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0x33, 0xFF, 0x33),
            foreground: Color::White,
            border: Color::DarkGray,
            system_text: Color::DarkGray,
        }
    }
}

impl ReaderTheme {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            accent: to_color(theme.color),
            ..Self::default()
        }
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Style for revealed text and the caret
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn caret_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::SLOW_BLINK)
    }

    /// Style for empty-state and hint text
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.border })
    }

    pub fn title_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(self.accent);
        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Style for the list row under the cursor
    pub fn cursor_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::UNDERLINED)
        }
    }
}
