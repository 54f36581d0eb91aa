//! Chapter and character registries.
//!
//! The catalog is built once at startup and shared read-only by every
//! other component. Each entry carries the color and symbol that make up
//! its visual identity.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tokio::fs;

/// Errors from building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate chapter id {0}")]
    DuplicateChapter(ChapterId),

    #[error("Duplicate character id {0}")]
    DuplicateCharacter(CharacterId),
}

/// Unique identifier for a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(pub u32);

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error parsing a `#RRGGBB` color code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color code '{0}': expected #RRGGBB")]
pub struct ColorParseError(pub String);

/// A 24-bit color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(err)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Opaque symbol identifier, resolved to artwork by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A chapter of the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub title: String,
    pub color: HexColor,
    pub symbol: Symbol,
}

/// A character the reader can select and question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub color: HexColor,
    pub symbol: Symbol,
    pub description: String,
}

/// On-disk shape of a catalog document.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    chapters: Vec<Chapter>,
    #[serde(default)]
    characters: Vec<Character>,
}

/// Immutable chapter and character lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    chapters: Vec<Chapter>,
    characters: Vec<Character>,
    chapter_index: HashMap<ChapterId, usize>,
    character_index: HashMap<CharacterId, usize>,
}

impl Catalog {
    /// Build a catalog, sorting entries by id and rejecting duplicates.
    pub fn new(
        mut chapters: Vec<Chapter>,
        mut characters: Vec<Character>,
    ) -> Result<Self, CatalogError> {
        chapters.sort_by_key(|c| c.id);
        characters.sort_by_key(|c| c.id);

        let mut chapter_index = HashMap::with_capacity(chapters.len());
        for (i, chapter) in chapters.iter().enumerate() {
            if chapter_index.insert(chapter.id, i).is_some() {
                return Err(CatalogError::DuplicateChapter(chapter.id));
            }
        }

        let mut character_index = HashMap::with_capacity(characters.len());
        for (i, character) in characters.iter().enumerate() {
            if character_index.insert(character.id, i).is_some() {
                return Err(CatalogError::DuplicateCharacter(character.id));
            }
        }

        Ok(Self {
            chapters,
            characters,
            chapter_index,
            character_index,
        })
    }

    /// Parse a JSON catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.chapters, file.characters)
    }

    /// Load a JSON catalog from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    /// The built-in Gibsey catalog.
    pub fn gibsey() -> Self {
        let chapters = GIBSEY_ENTRIES
            .iter()
            .enumerate()
            .map(|(i, e)| Chapter {
                id: ChapterId(i as u32),
                title: e.chapter_title.to_string(),
                color: e.color,
                symbol: Symbol::new(e.symbol),
            })
            .collect();
        let characters = GIBSEY_ENTRIES
            .iter()
            .enumerate()
            .map(|(i, e)| Character {
                id: CharacterId(i as u32),
                name: e.character_name.to_string(),
                color: e.color,
                symbol: Symbol::new(e.symbol),
                description: e.description.to_string(),
            })
            .collect();

        // Ids are positional, so they cannot collide.
        let catalog = Self::new(chapters, characters);
        debug_assert!(catalog.is_ok(), "built-in catalog has duplicate ids");
        catalog.unwrap_or_default()
    }

    pub fn chapter(&self, id: ChapterId) -> Option<&Chapter> {
        self.chapter_index.get(&id).map(|&i| &self.chapters[i])
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.character_index.get(&id).map(|&i| &self.characters[i])
    }

    /// Chapters in ascending id order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Characters in ascending id order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }
}

struct GibseyEntry {
    chapter_title: &'static str,
    character_name: &'static str,
    color: HexColor,
    symbol: &'static str,
    description: &'static str,
}

const GIBSEY_ENTRIES: [GibseyEntry; 16] = [
    GibseyEntry {
        chapter_title: "an author's preface",
        character_name: "an author",
        color: HexColor::rgb(0x33, 0xFF, 0x33),
        symbol: "symbol-author",
        description: "An Author is the fractured voice that echoes across all others.",
    },
    GibseyEntry {
        chapter_title: "London Fox Who Vertically Disintegrates",
        character_name: "London Fox",
        color: HexColor::rgb(0xFF, 0x33, 0x33),
        symbol: "symbol-london",
        description: "London Fox is a trickster of vertical disintegration, unraveling media itself.",
    },
    GibseyEntry {
        chapter_title: "An Unexpected Disappearance Ch. 1-6",
        character_name: "Glyph Marrow",
        color: HexColor::rgb(0x00, 0xA2, 0xFF),
        symbol: "symbol-glyph",
        description: "Glyph Marrow investigates disappearances and semantic decay.",
    },
    GibseyEntry {
        chapter_title: "An Expected Appearance Ch. 1-3",
        character_name: "Phillip Bafflemint",
        color: HexColor::rgb(0xFF, 0xFF, 0x33),
        symbol: "symbol-bafflemint",
        description: "Phillip Bafflemint builds order from narrative chaos.",
    },
    GibseyEntry {
        chapter_title: "Jacklyn Variance, The Watcher, Is Watched",
        character_name: "Jackyln Variance",
        color: HexColor::rgb(0xFF, 0x00, 0xFF),
        symbol: "symbol-jacklyn",
        description: "Jackyln Variance watches the watchers.",
    },
    GibseyEntry {
        chapter_title: "the Last Auteur",
        character_name: "Oren Progresso",
        color: HexColor::rgb(0x00, 0xFF, 0xAA),
        symbol: "symbol-oren",
        description: "Oren Progresso is the final auteur.",
    },
    GibseyEntry {
        chapter_title: "Gibseyan Mysticism and Its Symbolism",
        character_name: "Old Natalie Weissman",
        color: HexColor::rgb(0x7A, 0x3C, 0xFF),
        symbol: "symbol-old-natalie",
        description: "Old Natalie Weissman is a mystic scholar of Gibsey's forgotten patterns.",
    },
    GibseyEntry {
        chapter_title: "Princhetta Who Thinks Herself Alive",
        character_name: "Princhetta",
        color: HexColor::rgb(0xAA, 0xAA, 0xAA),
        symbol: "symbol-princhetta",
        description: "Princhetta believes she's alive, and maybe she is.",
    },
    GibseyEntry {
        chapter_title: "Petition For Bankruptcy: Chapter 11",
        character_name: "Cop-E-Right",
        color: HexColor::rgb(0xFF, 0xFF, 0xFF),
        symbol: "symbol-copyright",
        description: "Cop-E-Right protects, archives, and obstructs.",
    },
    GibseyEntry {
        chapter_title: "The Tempestuous Storm",
        character_name: "New Natalie Weissman",
        color: HexColor::rgb(0xCC, 0x66, 0xFF),
        symbol: "symbol-new-natalie",
        description: "New Natalie Weissman seeks vengeance in recursive storms.",
    },
    GibseyEntry {
        chapter_title: "Arieol Owlist Who Wants to Achieve Agency",
        character_name: "Arieol Owlist",
        color: HexColor::rgb(0x99, 0xCC, 0xFF),
        symbol: "symbol-arieol",
        description: "Arieol Owlist longs for real agency in a synthetic world.",
    },
    GibseyEntry {
        chapter_title: "The Biggest Shit of All Time",
        character_name: "Jack Parlance",
        color: HexColor::rgb(0xFF, 0x33, 0x85),
        symbol: "symbol-parlance",
        description: "Jack Parlance is a producer of unbearable legends.",
    },
    GibseyEntry {
        chapter_title: "An Expected Appearance Chap. 4-6",
        character_name: "Manny Valentinas",
        color: HexColor::rgb(0xFF, 0xB0, 0x00),
        symbol: "symbol-manny",
        description: "Manny Valentinas organizes expectation.",
    },
    GibseyEntry {
        chapter_title: "An Unexpected Disappearance Chap. 7-11",
        character_name: "Shamrock Stillman",
        color: HexColor::rgb(0x00, 0xFF, 0xFF),
        symbol: "symbol-shamrock",
        description: "Shamrock Stillman plays with disappearance and fame.",
    },
    GibseyEntry {
        chapter_title: "Todd Fishbone Who Dreams of Synchronistic Extraction",
        character_name: "Todd Fishbone",
        color: HexColor::rgb(0xFF, 0x77, 0x44),
        symbol: "symbol-todd",
        description: "Todd Fishbone dreams of synchronistic extraction.",
    },
    GibseyEntry {
        chapter_title: "The Author's Preface",
        character_name: "The Author",
        color: HexColor::rgb(0xBF, 0xFF, 0x00),
        symbol: "symbol-the-author",
        description: "The Author is the echo at the end of time.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parse() {
        let color: HexColor = "#00a2ff".parse().unwrap();
        assert_eq!(color, HexColor::rgb(0x00, 0xA2, 0xFF));
        assert_eq!(color.to_string(), "#00A2FF");

        assert!("00A2FF".parse::<HexColor>().is_err());
        assert!("#00A2F".parse::<HexColor>().is_err());
        assert!("#00A2FG".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::gibsey();
        assert_eq!(catalog.chapters().len(), 16);
        assert_eq!(catalog.characters().len(), 16);

        let glyph = catalog.character(CharacterId(2)).unwrap();
        assert_eq!(glyph.name, "Glyph Marrow");
        assert_eq!(glyph.color.to_string(), "#00A2FF");

        let oren = catalog.character(CharacterId(5)).unwrap();
        assert_eq!(oren.name, "Oren Progresso");

        assert!(catalog.chapter(ChapterId(999)).is_none());
    }

    #[test]
    fn test_from_json_sorts_by_id() {
        let json = r##"{
            "chapters": [
                { "id": 3, "title": "Three", "color": "#FFFF33", "symbol": "s3" },
                { "id": 1, "title": "One", "color": "#FF3333", "symbol": "s1" }
            ],
            "characters": []
        }"##;

        let catalog = Catalog::from_json(json).unwrap();
        let ids: Vec<u32> = catalog.chapters().iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(catalog.chapter(ChapterId(3)).unwrap().title, "Three");
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let json = r##"{
            "characters": [
                { "id": 1, "name": "A", "color": "#000000", "symbol": "a", "description": "" },
                { "id": 1, "name": "B", "color": "#FFFFFF", "symbol": "b", "description": "" }
            ]
        }"##;

        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateCharacter(CharacterId(1)))
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_color() {
        let json = r##"{
            "chapters": [{ "id": 0, "title": "x", "color": "green", "symbol": "s" }]
        }"##;

        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::Json(_))
        ));
    }
}
