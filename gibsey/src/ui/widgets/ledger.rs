//! Query ledger panel

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::theme::ReaderTheme;

const EMPTY_LEDGER: &str = "No queries submitted to this character yet.";

pub struct LedgerWidget<'a> {
    queries: &'a [String],
    scroll: usize,
    theme: &'a ReaderTheme,
    has_character: bool,
}

impl<'a> LedgerWidget<'a> {
    pub fn new(queries: &'a [String], theme: &'a ReaderTheme) -> Self {
        Self {
            queries,
            scroll: 0,
            theme,
            has_character: false,
        }
    }

    /// Index of the first query shown.
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn has_character(mut self, has_character: bool) -> Self {
        self.has_character = has_character;
        self
    }
}

impl Widget for LedgerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.queries.len() > 1 {
            format!(" Queries [{}/{}] ", self.scroll.min(self.queries.len() - 1) + 1, self.queries.len())
        } else {
            " Queries ".to_string()
        };

        let block = Block::default()
            .title(Span::styled(title, self.theme.title_style(false)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.queries.is_empty() {
            if self.has_character {
                Paragraph::new(Span::styled(EMPTY_LEDGER, self.theme.system_style()))
                    .wrap(Wrap { trim: true })
                    .render(inner, buf);
            }
            return;
        }

        let lines: Vec<Line> = self
            .queries
            .iter()
            .enumerate()
            .skip(self.scroll)
            .map(|(i, q)| {
                Line::from(vec![
                    Span::styled(format!("{:>3}. ", i + 1), self.theme.system_style()),
                    Span::styled(q.as_str(), self.theme.text_style()),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(widget: LedgerWidget<'_>) -> String {
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_empty_state_only_with_character() {
        let theme = ReaderTheme::default();
        assert!(!rendered(LedgerWidget::new(&[], &theme)).contains("No queries"));
        assert!(rendered(LedgerWidget::new(&[], &theme).has_character(true))
            .contains("No queries submitted to this character yet."));
    }

    #[test]
    fn test_scroll_skips_earlier_queries() {
        let theme = ReaderTheme::default();
        let queries = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        let text = rendered(LedgerWidget::new(&queries, &theme).scroll(1).has_character(true));
        assert!(!text.contains("first"));
        assert!(text.contains("  2. second"));
        assert!(text.contains("[2/3]"));
    }
}
