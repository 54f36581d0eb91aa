//! Active chapter, character, and page.
//!
//! Chapter and character are independent axes: selecting one never clears
//! the other. The theme is derived from whichever of the two wins under
//! the configured [`ThemePolicy`]. The description shown in the reveal
//! panel comes from whichever of character or page was selected last.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::{Chapter, ChapterId, Character, CharacterId, HexColor, Symbol};
use crate::pages::PageId;

/// Theme color used when nothing is selected.
pub const DEFAULT_THEME_COLOR: HexColor = HexColor::rgb(0x33, 0xFF, 0x33);

/// A selection axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Chapter,
    Character,
    Page,
}

/// How the theme is chosen when both a chapter and a character are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePolicy {
    /// The most recently selected of chapter and character.
    #[default]
    MostRecent,
    /// The character whenever one is active.
    CharacterFirst,
    /// The chapter whenever one is active.
    ChapterFirst,
}

impl FromStr for ThemePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "most-recent" | "most_recent" | "recent" => Ok(Self::MostRecent),
            "character-first" | "character_first" | "character" => Ok(Self::CharacterFirst),
            "chapter-first" | "chapter_first" | "chapter" => Ok(Self::ChapterFirst),
            other => Err(format!("unknown theme policy '{other}'")),
        }
    }
}

/// Where the active theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ThemeSource {
    Default,
    Chapter(ChapterId),
    Character(CharacterId),
}

/// Color and symbol for dependent views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub color: HexColor,
    pub symbol: Option<Symbol>,
    pub source: ThemeSource,
}

/// What the reveal panel is describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum DescriptionSource {
    Character(CharacterId),
    Page(PageId),
}

/// The active entity on each axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub chapter: Option<Chapter>,
    pub character: Option<Character>,
    pub page: Option<PageId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThemedAxis {
    Chapter,
    Character,
}

/// Owner of the current [`Selection`].
///
/// Every operation is total. Ids are validated against the catalog before
/// they get here. Operations that change the active description return
/// the new [`DescriptionSource`] so the caller can restart the reveal.
#[derive(Debug, Clone)]
pub struct SelectionState {
    selection: Selection,
    policy: ThemePolicy,
    default_color: HexColor,
    last_themed: Option<ThemedAxis>,
    description: Option<DescriptionSource>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(ThemePolicy::default(), DEFAULT_THEME_COLOR)
    }
}

impl SelectionState {
    pub fn new(policy: ThemePolicy, default_color: HexColor) -> Self {
        Self {
            selection: Selection::default(),
            policy,
            default_color,
            last_themed: None,
            description: None,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn policy(&self) -> ThemePolicy {
        self.policy
    }

    pub fn description(&self) -> Option<DescriptionSource> {
        self.description
    }

    pub fn select_chapter(&mut self, chapter: Chapter) {
        self.selection.chapter = Some(chapter);
        self.last_themed = Some(ThemedAxis::Chapter);
    }

    /// Select a character. Returns the new description source if it changed.
    pub fn select_character(&mut self, character: Character) -> Option<DescriptionSource> {
        let source = DescriptionSource::Character(character.id);
        self.selection.character = Some(character);
        self.last_themed = Some(ThemedAxis::Character);
        self.set_description(source)
    }

    /// Select a page. Returns the new description source if it changed.
    pub fn select_page(&mut self, page: PageId) -> Option<DescriptionSource> {
        self.selection.page = Some(page);
        self.set_description(DescriptionSource::Page(page))
    }

    /// Clear one axis. Returns true if the cleared axis supplied the
    /// active description, which is then gone.
    pub fn clear(&mut self, axis: Axis) -> bool {
        match axis {
            Axis::Chapter => {
                self.selection.chapter = None;
                if self.last_themed == Some(ThemedAxis::Chapter) {
                    self.last_themed = self.selection.character.as_ref().map(|_| ThemedAxis::Character);
                }
                false
            }
            Axis::Character => {
                self.selection.character = None;
                if self.last_themed == Some(ThemedAxis::Character) {
                    self.last_themed = self.selection.chapter.as_ref().map(|_| ThemedAxis::Chapter);
                }
                self.clear_description_if(|d| matches!(d, DescriptionSource::Character(_)))
            }
            Axis::Page => {
                self.selection.page = None;
                self.clear_description_if(|d| matches!(d, DescriptionSource::Page(_)))
            }
        }
    }

    /// The theme for dependent views under the configured policy.
    pub fn theme(&self) -> Theme {
        let winner = match self.policy {
            ThemePolicy::MostRecent => self.last_themed,
            ThemePolicy::CharacterFirst => self
                .selection
                .character
                .as_ref()
                .map(|_| ThemedAxis::Character)
                .or(self.selection.chapter.as_ref().map(|_| ThemedAxis::Chapter)),
            ThemePolicy::ChapterFirst => self
                .selection
                .chapter
                .as_ref()
                .map(|_| ThemedAxis::Chapter)
                .or(self.selection.character.as_ref().map(|_| ThemedAxis::Character)),
        };

        match winner {
            Some(ThemedAxis::Chapter) => self.selection.chapter.as_ref().map(|c| Theme {
                color: c.color,
                symbol: Some(c.symbol.clone()),
                source: ThemeSource::Chapter(c.id),
            }),
            Some(ThemedAxis::Character) => self.selection.character.as_ref().map(|c| Theme {
                color: c.color,
                symbol: Some(c.symbol.clone()),
                source: ThemeSource::Character(c.id),
            }),
            None => None,
        }
        .unwrap_or(Theme {
            color: self.default_color,
            symbol: None,
            source: ThemeSource::Default,
        })
    }

    fn set_description(&mut self, source: DescriptionSource) -> Option<DescriptionSource> {
        if self.description == Some(source) {
            return None;
        }
        self.description = Some(source);
        Some(source)
    }

    fn clear_description_if(&mut self, pred: impl Fn(DescriptionSource) -> bool) -> bool {
        match self.description {
            Some(d) if pred(d) => {
                self.description = None;
                true
            }
            _ => false,
        }
    }
}
