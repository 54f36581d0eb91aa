//! Page text supplied by an external book file.
//!
//! Books are plain text with pages separated by `===`. Page numbers follow
//! the segment order of the file, starting at 1.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Page separator used by book files.
pub const PAGE_DELIMITER: &str = "===";

/// Errors from loading a page library.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page number, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u32);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered collection of page texts.
#[derive(Debug, Clone, Default)]
pub struct PageLibrary {
    pages: BTreeMap<PageId, String>,
}

impl PageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a book into pages.
    ///
    /// A leading empty segment is dropped. Segments that are blank after
    /// trimming keep their page number but are not stored. Runs of
    /// whitespace inside a page, line breaks included, fold to one space.
    pub fn from_text(content: &str) -> Self {
        let mut segments: Vec<&str> = content.split(PAGE_DELIMITER).collect();
        if segments.first().is_some_and(|s| s.trim().is_empty()) {
            segments.remove(0);
        }

        let pages = segments
            .into_iter()
            .enumerate()
            .filter_map(|(i, segment)| {
                let text = segment.split_whitespace().collect::<Vec<_>>().join(" ");
                (!text.is_empty()).then(|| (PageId(i as u32 + 1), text))
            })
            .collect();

        Self { pages }
    }

    /// Load a book file from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PageError> {
        let content = fs::read_to_string(path).await?;
        Ok(Self::from_text(&content))
    }

    /// Insert or replace a single page.
    pub fn insert(&mut self, id: PageId, text: impl Into<String>) {
        self.pages.insert(id, text.into());
    }

    pub fn page(&self, id: PageId) -> Option<&str> {
        self.pages.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.pages.contains_key(&id)
    }

    pub fn first(&self) -> Option<PageId> {
        self.pages.keys().next().copied()
    }

    /// The next stored page after `id`.
    pub fn next_after(&self, id: PageId) -> Option<PageId> {
        let from = PageId(id.0.checked_add(1)?);
        self.pages.range(from..).next().map(|(&k, _)| k)
    }

    /// The closest stored page before `id`.
    pub fn previous_before(&self, id: PageId) -> Option<PageId> {
        self.pages.range(..id).next_back().map(|(&k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_numbers_segments() {
        let book = "===\nFirst page.\n===\nSecond page.\n===\n   \n===\nFourth page.\n";
        let library = PageLibrary::from_text(book);

        assert_eq!(library.len(), 3);
        assert_eq!(library.page(PageId(1)), Some("First page."));
        assert_eq!(library.page(PageId(2)), Some("Second page."));
        assert_eq!(library.page(PageId(3)), None);
        assert_eq!(library.page(PageId(4)), Some("Fourth page."));
    }

    #[test]
    fn test_from_text_without_leading_delimiter() {
        let library = PageLibrary::from_text("Alpha===Beta");
        assert_eq!(library.page(PageId(1)), Some("Alpha"));
        assert_eq!(library.page(PageId(2)), Some("Beta"));
    }

    #[test]
    fn test_neighbours_skip_gaps() {
        let library = PageLibrary::from_text("a===b======d");
        assert_eq!(library.first(), Some(PageId(1)));
        assert_eq!(library.next_after(PageId(2)), Some(PageId(4)));
        assert_eq!(library.previous_before(PageId(4)), Some(PageId(2)));
        assert_eq!(library.previous_before(PageId(1)), None);
        assert_eq!(library.next_after(PageId(4)), None);
    }

    #[test]
    fn test_no_next_after_last_possible_page() {
        let mut library = PageLibrary::new();
        library.insert(PageId(u32::MAX), "The end.");
        assert_eq!(library.next_after(PageId(u32::MAX)), None);
        assert_eq!(library.next_after(PageId(u32::MAX - 1)), Some(PageId(u32::MAX)));
    }

    #[test]
    fn test_line_breaks_fold_to_spaces() {
        let library = PageLibrary::from_text("The rain\nfell  on\r\n\tthe park.");
        assert_eq!(library.page(PageId(1)), Some("The rain fell on the park."));
    }

    #[test]
    fn test_empty_library() {
        let library = PageLibrary::from_text("");
        assert!(library.is_empty());
        assert_eq!(library.first(), None);
    }
}
