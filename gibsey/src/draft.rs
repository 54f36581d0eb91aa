//! The query being typed, plus recall of earlier queries.

use std::collections::VecDeque;

const RECALL_LIMIT: usize = 100;

/// Editable query text with a caret measured in characters.
#[derive(Debug, Clone, Default)]
pub struct QueryDraft {
    chars: Vec<char>,
    caret: usize,
    /// Sent queries, newest first.
    sent: VecDeque<String>,
    /// Position in `sent` while recalling.
    recalling: Option<usize>,
    /// What was being typed before recall started.
    stashed: Vec<char>,
}

impl QueryDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.caret, c);
        self.caret += 1;
    }

    /// Remove the character before the caret.
    pub fn erase_back(&mut self) {
        if self.caret > 0 {
            self.caret -= 1;
            self.chars.remove(self.caret);
        }
    }

    /// Remove the character under the caret.
    pub fn erase_forward(&mut self) {
        if self.caret < self.chars.len() {
            self.chars.remove(self.caret);
        }
    }

    pub fn left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.caret = (self.caret + 1).min(self.chars.len());
    }

    pub fn home(&mut self) {
        self.caret = 0;
    }

    pub fn end(&mut self) {
        self.caret = self.chars.len();
    }

    /// Replace the draft with an earlier query.
    pub fn recall_older(&mut self) {
        let next = match self.recalling {
            None => 0,
            Some(i) => i + 1,
        };
        let Some(query) = self.sent.get(next) else {
            return;
        };
        if self.recalling.is_none() {
            self.stashed = std::mem::take(&mut self.chars);
        }
        self.chars = query.chars().collect();
        self.caret = self.chars.len();
        self.recalling = Some(next);
    }

    /// Step back toward the draft that was being typed before recall.
    pub fn recall_newer(&mut self) {
        match self.recalling {
            None => {}
            Some(0) => {
                self.chars = std::mem::take(&mut self.stashed);
                self.recalling = None;
            }
            Some(i) => {
                if let Some(query) = self.sent.get(i - 1) {
                    self.chars = query.chars().collect();
                }
                self.recalling = Some(i - 1);
            }
        }
        self.caret = self.chars.len();
    }

    /// Take the text for submission and remember it for recall.
    ///
    /// Returns `None` when nothing has been typed.
    pub fn send(&mut self) -> Option<String> {
        if self.chars.is_empty() {
            return None;
        }
        let text: String = std::mem::take(&mut self.chars).into_iter().collect();
        self.caret = 0;
        self.recalling = None;
        self.stashed.clear();

        self.sent.push_front(text.clone());
        self.sent.truncate(RECALL_LIMIT);
        Some(text)
    }
}

#[cfg(test)]
impl QueryDraft {
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn set(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.caret = self.chars.len();
    }

    /// Sent queries, newest first.
    pub fn sent(&self) -> impl Iterator<Item = &str> {
        self.sent.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> QueryDraft {
        let mut draft = QueryDraft::new();
        text.chars().for_each(|c| draft.insert(c));
        draft
    }

    #[test]
    fn test_editing_is_char_based() {
        let mut draft = typed("héllo");
        draft.left();
        draft.left();
        draft.left();
        draft.erase_back();
        assert_eq!(draft.text(), "hllo");
        assert_eq!(draft.caret(), 1);

        draft.home();
        draft.erase_forward();
        assert_eq!(draft.text(), "llo");

        draft.end();
        draft.right();
        assert_eq!(draft.caret(), 3);
    }

    #[test]
    fn test_send_clears_and_remembers() {
        let mut draft = typed("why?");
        assert_eq!(draft.send().as_deref(), Some("why?"));
        assert!(draft.is_empty());
        assert_eq!(draft.caret(), 0);
        assert_eq!(draft.send(), None);
        assert_eq!(draft.sent().collect::<Vec<_>>(), vec!["why?"]);
    }

    #[test]
    fn test_recall_round_trip_restores_draft() {
        let mut draft = QueryDraft::new();
        for q in ["first", "second"] {
            draft.set(q);
            draft.send();
        }
        draft.set("unsent");

        draft.recall_older();
        assert_eq!(draft.text(), "second");
        draft.recall_older();
        assert_eq!(draft.text(), "first");
        draft.recall_older();
        assert_eq!(draft.text(), "first");

        draft.recall_newer();
        assert_eq!(draft.text(), "second");
        draft.recall_newer();
        assert_eq!(draft.text(), "unsent");
        assert_eq!(draft.caret(), 6);
    }

    #[test]
    fn test_recall_limit() {
        let mut draft = QueryDraft::new();
        for n in 0..RECALL_LIMIT + 5 {
            draft.set(&n.to_string());
            draft.send();
        }
        assert_eq!(draft.sent().count(), RECALL_LIMIT);
        assert_eq!(draft.sent().next(), Some("104"));
    }
}
