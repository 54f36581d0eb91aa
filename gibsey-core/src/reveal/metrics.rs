//! Text measurement supplied by the presentation layer.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// The font the revealed text is rendered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// One terminal cell per column.
    pub fn terminal() -> Self {
        Self::new("terminal", 1.0)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Courier Prime", 14.0)
    }
}

/// Measures the rendered width of a string.
///
/// Implementations must be pure: the same text and font always measure
/// the same width.
pub trait FontMetrics: Send + Sync {
    fn measure(&self, text: &str, font: &Font) -> f32;
}

impl<F> FontMetrics for F
where
    F: Fn(&str, &Font) -> f32 + Send + Sync,
{
    fn measure(&self, text: &str, font: &Font) -> f32 {
        self(text, font)
    }
}

/// Fixed-advance metrics for monospace faces.
///
/// Wide glyphs (CJK, most emoji) count as two columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Horizontal advance per column, as a fraction of the font size.
    pub advance: f32,
}

impl MonospaceMetrics {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self { advance: 1.0 }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn measure(&self, text: &str, font: &Font) -> f32 {
        text.width() as f32 * font.size * self.advance
    }
}
