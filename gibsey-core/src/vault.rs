//! Bookmarked pages and chapters ("the vault").

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::catalog::ChapterId;
use crate::pages::PageId;

/// Identifier of a vault entry, e.g. `page-12` or `ch3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultId(pub String);

impl VaultId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn for_page(page: PageId) -> Self {
        Self(format!("page-{}", page.0))
    }

    pub fn for_chapter(chapter: ChapterId) -> Self {
        Self(format!("ch{}", chapter.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// What selecting this entry should open, if the id is well formed.
    pub fn target(&self) -> Option<VaultTarget> {
        let id = self.0.trim();
        if let Some(n) = id.strip_prefix("page-") {
            return n.parse().ok().map(|n| VaultTarget::Page(PageId(n)));
        }
        id.strip_prefix("chapter-")
            .or_else(|| id.strip_prefix("ch"))
            .and_then(|n| n.parse().ok())
            .map(|n| VaultTarget::Chapter(ChapterId(n)))
    }
}

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VaultId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The selection a vault entry leads back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum VaultTarget {
    Page(PageId),
    Chapter(ChapterId),
}

/// A bookmarked page or chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntry {
    pub id: VaultId,
    pub label: String,
}

impl VaultEntry {
    pub fn new(id: impl Into<VaultId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Whether a toggle added or removed the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultToggle {
    Added,
    Removed,
}

/// Bookmarks in insertion order, unique by id.
#[derive(Debug, Clone, Default)]
pub struct VaultStore {
    entries: Vec<VaultEntry>,
}

impl VaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. An existing id keeps its position and takes the new label.
    pub fn add(&mut self, entry: VaultEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            existing.label = entry.label;
        } else {
            info!(id = %entry.id, label = %entry.label, "vault entry added");
            self.entries.push(entry);
        }
    }

    /// Remove an entry. Returns it if it was present.
    pub fn remove(&mut self, id: &VaultId) -> Option<VaultEntry> {
        let pos = self.entries.iter().position(|e| &e.id == id)?;
        info!(%id, "vault entry removed");
        Some(self.entries.remove(pos))
    }

    /// Remove the entry if present, otherwise add it.
    pub fn toggle(&mut self, entry: VaultEntry) -> VaultToggle {
        if self.remove(&entry.id).is_some() {
            VaultToggle::Removed
        } else {
            self.add(entry);
            VaultToggle::Added
        }
    }

    pub fn contains(&self, id: &VaultId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    pub fn get(&self, id: &VaultId) -> Option<&VaultEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Entries in insertion order.
    pub fn list(&self) -> &[VaultEntry] {
        &self.entries
    }

    /// The selection to perform for `id`, or `None` if the id is absent or
    /// does not name a page or chapter.
    pub fn navigate_to(&self, id: &VaultId) -> Option<VaultTarget> {
        self.get(id).and_then(|e| e.id.target())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
