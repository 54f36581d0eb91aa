//! Selectable list panel for chapters, characters, and vault entries

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::ReaderTheme;

/// One row of a [`NavListWidget`].
#[derive(Debug, Clone)]
pub struct NavItem {
    pub label: String,
    /// Swatch color shown before the label.
    pub color: Option<Color>,
    /// Whether this entry is the current selection.
    pub active: bool,
}

pub struct NavListWidget<'a> {
    title: &'a str,
    items: Vec<NavItem>,
    cursor: usize,
    theme: &'a ReaderTheme,
    focused: bool,
    empty_text: &'a str,
}

impl<'a> NavListWidget<'a> {
    pub fn new(title: &'a str, items: Vec<NavItem>, theme: &'a ReaderTheme) -> Self {
        Self {
            title,
            items,
            cursor: 0,
            theme,
            focused: false,
            empty_text: "",
        }
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }
}

impl Widget for NavListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                self.theme.title_style(self.focused),
            ))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.items.is_empty() {
            let line = Line::from(Span::styled(self.empty_text, self.theme.system_style()));
            Paragraph::new(line).render(inner, buf);
            return;
        }

        // Keep the cursor row on screen
        let visible = inner.height as usize;
        let offset = if visible == 0 {
            0
        } else {
            self.cursor.saturating_sub(visible - 1)
        };

        let lines: Vec<Line> = self
            .items
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, item)| {
                let mut style = self.theme.text_style();
                if item.active {
                    style = style.fg(self.theme.accent).add_modifier(Modifier::BOLD);
                }
                if i == self.cursor {
                    style = style.patch(self.theme.cursor_style(self.focused));
                }

                let swatch = match item.color {
                    Some(color) => Span::styled("■ ", Style::default().fg(color)),
                    None => Span::raw("  "),
                };
                Line::from(vec![swatch, Span::styled(item.label.clone(), style)])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_empty_list_shows_placeholder() {
        let theme = ReaderTheme::default();
        let area = Rect::new(0, 0, 24, 4);
        let mut buf = Buffer::empty(area);

        NavListWidget::new("Vault", Vec::new(), &theme)
            .empty_text("No pages saved.")
            .render(area, &mut buf);

        assert!(row_text(&buf, 1).contains("No pages saved."));
    }

    #[test]
    fn test_cursor_scrolls_into_view() {
        let theme = ReaderTheme::default();
        let items = (0..10)
            .map(|i| NavItem {
                label: format!("item {i}"),
                color: None,
                active: false,
            })
            .collect();
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);

        NavListWidget::new("List", items, &theme)
            .cursor(7)
            .render(area, &mut buf);

        // Three visible rows, ending at the cursor
        assert!(row_text(&buf, 1).contains("item 5"));
        assert!(row_text(&buf, 3).contains("item 7"));
    }
}
