//! Query box addressed to the selected character

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::draft::QueryDraft;
use crate::ui::theme::ReaderTheme;

const PROMPT: &str = "> ";

/// First character to draw so the caret stays inside `width` cells.
fn scroll_start(chars: &[char], caret: usize, width: usize) -> usize {
    let mut start = 0;
    let mut cells: usize = chars[..caret].iter().map(|c| c.width().unwrap_or(0)).sum();
    // Leave one cell for the caret itself.
    while start < caret && cells + 1 > width {
        cells -= chars[start].width().unwrap_or(0);
        start += 1;
    }
    start
}

pub struct QueryBox<'a> {
    draft: &'a QueryDraft,
    theme: &'a ReaderTheme,
    addressee: Option<&'a str>,
    typing: bool,
}

impl<'a> QueryBox<'a> {
    pub fn new(draft: &'a QueryDraft, theme: &'a ReaderTheme) -> Self {
        Self {
            draft,
            theme,
            addressee: None,
            typing: false,
        }
    }

    /// Name of the character the query goes to.
    pub fn addressee(mut self, name: Option<&'a str>) -> Self {
        self.addressee = name;
        self
    }

    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = typing;
        self
    }
}

impl Widget for QueryBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.addressee {
            Some(name) => format!(" Ask {name} "),
            None => " Ask ".to_string(),
        };
        let block = Block::default()
            .title(Span::styled(title, self.theme.title_style(self.typing)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.typing));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.draft.is_empty() && !self.typing {
            let hint = match self.addressee {
                Some(_) => "press i to type a question",
                None => "select a character to ask a question",
            };
            Paragraph::new(Line::from(vec![
                Span::styled(PROMPT, self.theme.accent_style()),
                Span::styled(hint, self.theme.system_style()),
            ]))
            .render(inner, buf);
            return;
        }

        let width = (inner.width as usize).saturating_sub(PROMPT.len());
        let chars = self.draft.chars();
        let start = scroll_start(chars, self.draft.caret(), width);
        let visible: String = chars[start..].iter().collect();

        Paragraph::new(Line::from(vec![
            Span::styled(PROMPT, self.theme.accent_style()),
            Span::styled(visible, self.theme.text_style()),
        ]))
        .render(inner, buf);

        if self.typing && width > 0 {
            let before: usize = chars[start..self.draft.caret()]
                .iter()
                .map(|c| c.width().unwrap_or(0))
                .sum();
            let x = inner.x + (PROMPT.len() + before) as u16;
            if x < inner.x + inner.width {
                buf[(x, inner.y)].set_style(self.theme.caret_style());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn test_scroll_keeps_caret_visible() {
        let chars: Vec<char> = "abcdefgh".chars().collect();
        assert_eq!(scroll_start(&chars, 3, 10), 0);
        assert_eq!(scroll_start(&chars, 8, 5), 4);

        let wide: Vec<char> = "日本語".chars().collect();
        assert_eq!(scroll_start(&wide, 3, 5), 1);
    }

    #[test]
    fn test_hint_names_the_next_step() {
        let theme = ReaderTheme::default();
        let draft = QueryDraft::new();
        let area = Rect::new(0, 0, 50, 3);

        let mut buf = Buffer::empty(area);
        QueryBox::new(&draft, &theme).render(area, &mut buf);
        assert!(row(&buf, 1).contains("select a character"));

        let mut buf = Buffer::empty(area);
        QueryBox::new(&draft, &theme)
            .addressee(Some("Glyph Marrow"))
            .render(area, &mut buf);
        assert!(row(&buf, 0).contains("Ask Glyph Marrow"));
        assert!(row(&buf, 1).contains("press i"));
    }

    #[test]
    fn test_long_draft_scrolls() {
        let theme = ReaderTheme::default();
        let mut draft = QueryDraft::new();
        "0123456789abc".chars().for_each(|c| draft.insert(c));
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);

        QueryBox::new(&draft, &theme).typing(true).render(area, &mut buf);

        // Inner width 10 less the prompt leaves seven characters and the caret.
        assert!(row(&buf, 1).contains("> 6789abc"));
        assert!(!row(&buf, 1).contains('5'));
    }
}
