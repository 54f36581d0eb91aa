//! Reveal panel: the typewritten description with its caret

use gibsey_core::RevealView;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::ui::theme::ReaderTheme;

const EMPTY_DESCRIPTION: &str = "Select a character to see their description.";
const CARET: &str = "▌";

/// Text broken into rows of at most `width` cells.
#[derive(Debug, PartialEq)]
struct Wrapped {
    rows: Vec<String>,
    /// Cell just past the last character, as (row, column).
    caret: (usize, usize),
}

/// Break `text` into rows of at most `width` cells.
///
/// A wide character that would straddle the edge starts the next row, so
/// the caret is taken from the walk rather than from the raw width.
fn wrap_cells(text: &str, width: usize) -> Wrapped {
    let mut rows = vec![String::new()];
    let mut used = 0;
    if width == 0 {
        return Wrapped { rows, caret: (0, 0) };
    }

    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            rows.push(String::new());
            used = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(ch);
        }
        used += w;
    }

    let last = rows.len() - 1;
    let caret = if used >= width { (last + 1, 0) } else { (last, used) };
    Wrapped { rows, caret }
}

pub struct RevealWidget<'a> {
    view: &'a RevealView,
    header: &'a str,
    theme: &'a ReaderTheme,
}

impl<'a> RevealWidget<'a> {
    pub fn new(view: &'a RevealView, theme: &'a ReaderTheme) -> Self {
        Self {
            view,
            header: "",
            theme,
        }
    }

    /// Name of what is being described, shown in the border.
    pub fn header(mut self, header: &'a str) -> Self {
        self.header = header;
        self
    }
}

impl Widget for RevealWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.header.is_empty() {
            String::new()
        } else {
            format!(" {} ", self.header)
        };
        let block = Block::default()
            .title(Span::styled(title, self.theme.title_style(true)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.view.source_text.is_empty() {
            Paragraph::new(Span::styled(EMPTY_DESCRIPTION, self.theme.system_style()))
                .render(inner, buf);
            return;
        }

        let width = inner.width as usize;
        let wrapped = wrap_cells(&self.view.revealed_text, width);
        let lines: Vec<Line> = wrapped
            .rows
            .into_iter()
            .map(|row| Line::from(Span::styled(row, self.theme.accent_style())))
            .collect();
        Paragraph::new(lines).render(inner, buf);

        if width == 0 {
            return;
        }
        let (row, col) = wrapped.caret;
        if row < inner.height as usize {
            let x = inner.x + col as u16;
            let y = inner.y + row as u16;
            buf[(x, y)].set_symbol(CARET).set_style(self.theme.caret_style());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gibsey_core::SessionId;

    fn view(source: &str, revealed: usize) -> RevealView {
        let revealed_text: String = source.chars().take(revealed).collect();
        RevealView {
            session: SessionId(1),
            source_text: source.to_string(),
            caret_offset: revealed_text.chars().filter_map(|c| c.width()).sum::<usize>() as f32,
            revealed_text,
            revealed_len: revealed,
            total_len: source.chars().count(),
            running: revealed < source.chars().count(),
        }
    }

    #[test]
    fn test_wrap_cells() {
        assert_eq!(wrap_cells("abcdef", 4).rows, vec!["abcd", "ef"]);
        assert_eq!(wrap_cells("abc日", 4).rows, vec!["abc", "日"]);
        assert_eq!(wrap_cells("", 4).rows, vec![""]);
    }

    #[test]
    fn test_wrap_cells_caret() {
        assert_eq!(wrap_cells("", 4).caret, (0, 0));
        assert_eq!(wrap_cells("ab", 4).caret, (0, 2));
        assert_eq!(wrap_cells("abcd", 4).caret, (1, 0));
        // The wide glyph leaves a gap on row 0 and ends two cells into row 1.
        assert_eq!(wrap_cells("abc日", 4).caret, (1, 2));
    }

    #[test]
    fn test_caret_after_wide_glyph_wrap() {
        let theme = ReaderTheme::default();
        let area = Rect::new(0, 0, 7, 5);
        let mut buf = Buffer::empty(area);
        let view = view("ab日日", 4);

        RevealWidget::new(&view, &theme).render(area, &mut buf);

        // Inner width 5: "ab日" fills four cells, the second 日 wraps.
        assert_eq!(buf[(1, 2)].symbol(), "日");
        assert_eq!(buf[(3, 2)].symbol(), CARET);
    }

    #[test]
    fn test_caret_follows_revealed_prefix() {
        let theme = ReaderTheme::default();
        let area = Rect::new(0, 0, 8, 5);
        let mut buf = Buffer::empty(area);
        let view = view("abcdefghij", 7);

        RevealWidget::new(&view, &theme).render(area, &mut buf);

        // Inner width 6: "abcdef" on row 1, "g" then the caret on row 2.
        assert_eq!(buf[(1, 2)].symbol(), "g");
        assert_eq!(buf[(2, 2)].symbol(), CARET);
    }

    #[test]
    fn test_empty_description_placeholder() {
        let theme = ReaderTheme::default();
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        let view = view("", 0);

        RevealWidget::new(&view, &theme).render(area, &mut buf);

        let row: String = (0..60).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("Select a character to see their description."));
    }
}
