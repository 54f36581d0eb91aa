//! InteractionController - the single entry point for user events.
//!
//! The controller owns the selection, reveal engine, query ledger, and
//! vault. Every handler validates its input, updates state completely,
//! and republishes a [`ViewSnapshot`] before returning. A rejected event
//! leaves all state as it was.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::catalog::{Catalog, ChapterId, CharacterId};
use crate::config::ReaderConfig;
use crate::ledger::{LedgerError, QueryLedger, QueryOutcome};
use crate::pages::{PageId, PageLibrary};
use crate::reveal::{
    Font, FontMetrics, MonospaceMetrics, RevealSession, RevealTick, SessionId, TextRevealEngine,
    TickOutcome, TickScheduler,
};
use crate::selection::{Axis, DescriptionSource, Selection, SelectionState, Theme};
use crate::vault::{VaultEntry, VaultId, VaultStore, VaultTarget, VaultToggle};

/// An event the controller refused. State is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Declined {
    #[error("No chapter with id {0}")]
    UnknownChapter(ChapterId),

    #[error("No character with id {0}")]
    UnknownCharacter(CharacterId),

    #[error("No page {0}")]
    UnknownPage(PageId),

    #[error("Select a character before asking a question")]
    NoActiveCharacter,
}

/// Broad class of a [`Declined`] event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineKind {
    /// The event named something that does not exist.
    InvalidReference,
    /// The event is not allowed in the current state.
    PreconditionViolation,
}

impl Declined {
    pub fn kind(&self) -> DeclineKind {
        match self {
            Declined::UnknownChapter(_)
            | Declined::UnknownCharacter(_)
            | Declined::UnknownPage(_) => DeclineKind::InvalidReference,
            Declined::NoActiveCharacter => DeclineKind::PreconditionViolation,
        }
    }
}

/// Scroll direction for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// How far the presentation should scroll a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollHint {
    pub direction: ScrollDirection,
    /// Signed offset; negative scrolls up.
    pub delta: i32,
}

/// The reveal panel as the presentation sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevealView {
    pub session: SessionId,
    pub source_text: String,
    pub revealed_text: String,
    pub revealed_len: usize,
    pub total_len: usize,
    pub caret_offset: f32,
    pub running: bool,
}

impl From<&RevealSession> for RevealView {
    fn from(session: &RevealSession) -> Self {
        Self {
            session: session.id,
            source_text: session.source_text.clone(),
            revealed_text: session.revealed_text().to_string(),
            revealed_len: session.revealed_len,
            total_len: session.total_len,
            caret_offset: session.caret_offset,
            running: session.running,
        }
    }
}

/// Everything the presentation needs to draw a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub selection: Selection,
    pub description: Option<DescriptionSource>,
    pub theme: Theme,
    pub reveal: RevealView,
    /// Queries submitted to the active character, oldest first.
    pub queries: Vec<String>,
    /// Vault entries in insertion order.
    pub vault: Vec<VaultEntry>,
    pub vault_is_empty: bool,
}

/// Composes selection, reveal, ledger, and vault behind one event API.
pub struct InteractionController {
    catalog: Arc<Catalog>,
    pages: Arc<PageLibrary>,
    selection: SelectionState,
    reveal: TextRevealEngine,
    ledger: QueryLedger,
    vault: VaultStore,
    scroll_step: u32,
    publisher: watch::Sender<ViewSnapshot>,
}

impl InteractionController {
    /// Create a controller measuring text with monospace metrics in a
    /// terminal font.
    pub fn new(
        catalog: Arc<Catalog>,
        pages: Arc<PageLibrary>,
        config: &ReaderConfig,
        scheduler: Box<dyn TickScheduler>,
    ) -> Self {
        let selection = SelectionState::new(config.theme_policy, config.default_color);
        let reveal = TextRevealEngine::new(
            scheduler,
            Arc::new(MonospaceMetrics::default()),
            Font::terminal(),
        )
        .with_interval(config.tick_interval);
        let ledger = QueryLedger::for_catalog(&catalog);
        let vault = VaultStore::new();

        let initial = build_snapshot(&selection, &reveal, &ledger, &vault);
        let (publisher, _) = watch::channel(initial);

        Self {
            catalog,
            pages,
            selection,
            reveal,
            ledger,
            vault,
            scroll_step: config.scroll_step,
            publisher,
        }
    }

    /// Use presentation-supplied text measurement.
    pub fn with_metrics(mut self, metrics: Arc<dyn FontMetrics>, font: Font) -> Self {
        self.reveal.set_metrics(metrics);
        self.reveal.set_font(font);
        self.publish();
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pages(&self) -> &PageLibrary {
        &self.pages
    }

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    pub fn theme(&self) -> Theme {
        self.selection.theme()
    }

    pub fn reveal(&self) -> &RevealSession {
        self.reveal.session()
    }

    pub fn ledger(&self) -> &QueryLedger {
        &self.ledger
    }

    pub fn vault(&self) -> &VaultStore {
        &self.vault
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn on_select_chapter(&mut self, id: ChapterId) -> Result<(), Declined> {
        let chapter = self
            .catalog
            .chapter(id)
            .cloned()
            .ok_or_else(|| declined(Declined::UnknownChapter(id)))?;

        debug!(chapter = %id, "chapter selected");
        self.selection.select_chapter(chapter);
        self.publish();
        Ok(())
    }

    pub fn on_select_character(&mut self, id: CharacterId) -> Result<(), Declined> {
        let character = self
            .catalog
            .character(id)
            .cloned()
            .ok_or_else(|| declined(Declined::UnknownCharacter(id)))?;

        debug!(character = %id, "character selected");
        let description = character.description.clone();
        if self.selection.select_character(character).is_some() {
            self.reveal.start(description);
        }
        self.publish();
        Ok(())
    }

    pub fn on_select_page(&mut self, id: PageId) -> Result<(), Declined> {
        let text = self
            .pages
            .page(id)
            .map(str::to_string)
            .ok_or_else(|| declined(Declined::UnknownPage(id)))?;

        debug!(page = %id, "page selected");
        if self.selection.select_page(id).is_some() {
            self.reveal.start(text);
        }
        self.publish();
        Ok(())
    }

    /// Select the page after the active one, or the first page if none is active.
    pub fn on_next_page(&mut self) -> Result<PageId, Declined> {
        let target = match self.selection.selection().page {
            Some(current) => self
                .pages
                .next_after(current)
                .ok_or_else(|| declined(Declined::UnknownPage(PageId(current.0.saturating_add(1)))))?,
            None => self
                .pages
                .first()
                .ok_or_else(|| declined(Declined::UnknownPage(PageId(1))))?,
        };
        self.on_select_page(target)?;
        Ok(target)
    }

    /// Select the page before the active one.
    pub fn on_previous_page(&mut self) -> Result<PageId, Declined> {
        let current = self
            .selection
            .selection()
            .page
            .ok_or_else(|| declined(Declined::UnknownPage(PageId(0))))?;
        let target = self
            .pages
            .previous_before(current)
            .ok_or_else(|| declined(Declined::UnknownPage(PageId(current.0.saturating_sub(1)))))?;
        self.on_select_page(target)?;
        Ok(target)
    }

    /// Clear one selection axis. If it supplied the description, the reveal
    /// is reset to an empty session.
    pub fn on_clear(&mut self, axis: Axis) {
        debug!(?axis, "selection cleared");
        if self.selection.clear(axis) {
            self.reveal.start(String::new());
        }
        self.publish();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Record a query for the active character.
    pub fn on_submit_query(&mut self, text: &str) -> Result<QueryOutcome, Declined> {
        let character = self
            .selection
            .selection()
            .character
            .as_ref()
            .map(|c| c.id)
            .ok_or_else(|| declined(Declined::NoActiveCharacter))?;

        let outcome = self
            .ledger
            .submit(character, text)
            .map_err(|LedgerError::UnknownCharacter(id)| declined(Declined::UnknownCharacter(id)))?;

        if outcome != QueryOutcome::Ignored {
            self.publish();
        }
        Ok(outcome)
    }

    // =========================================================================
    // Vault
    // =========================================================================

    /// Bookmark the entry, or remove it if it is already bookmarked.
    ///
    /// A new entry naming a page or chapter that does not exist is declined.
    /// Ids that name neither are stored as plain bookmarks.
    pub fn on_toggle_vault(
        &mut self,
        id: impl Into<VaultId>,
        label: impl Into<String>,
    ) -> Result<VaultToggle, Declined> {
        let entry = VaultEntry::new(id, label);
        if !self.vault.contains(&entry.id) {
            self.check_vault_target(&entry.id)?;
        }

        let toggle = self.vault.toggle(entry);
        self.publish();
        Ok(toggle)
    }

    /// Bookmark the active page, labelled with its number.
    pub fn on_toggle_vault_page(&mut self) -> Option<VaultToggle> {
        let page = self.selection.selection().page?;
        // The active page always exists, so this is never declined.
        self.on_toggle_vault(VaultId::for_page(page), format!("Page {page}"))
            .ok()
    }

    fn check_vault_target(&self, id: &VaultId) -> Result<(), Declined> {
        match id.target() {
            Some(VaultTarget::Page(page)) if !self.pages.contains(page) => {
                Err(declined(Declined::UnknownPage(page)))
            }
            Some(VaultTarget::Chapter(chapter)) if self.catalog.chapter(chapter).is_none() => {
                Err(declined(Declined::UnknownChapter(chapter)))
            }
            _ => Ok(()),
        }
    }

    /// Jump to a bookmarked page or chapter.
    ///
    /// Returns `Ok(None)` without changing anything if the id is not in the
    /// vault or does not name a page or chapter.
    pub fn on_navigate_vault(&mut self, id: &VaultId) -> Result<Option<VaultTarget>, Declined> {
        let Some(target) = self.vault.navigate_to(id) else {
            debug!(%id, "vault navigation ignored");
            return Ok(None);
        };

        match target {
            VaultTarget::Page(page) => self.on_select_page(page)?,
            VaultTarget::Chapter(chapter) => self.on_select_chapter(chapter)?,
        }
        Ok(Some(target))
    }

    // =========================================================================
    // Presentation hints and timer
    // =========================================================================

    /// Scroll hint for list views. Changes no state.
    pub fn on_scroll(&self, direction: ScrollDirection) -> ScrollHint {
        let step = i32::try_from(self.scroll_step).unwrap_or(i32::MAX);
        let delta = match direction {
            ScrollDirection::Up => -step,
            ScrollDirection::Down => step,
        };
        ScrollHint { direction, delta }
    }

    /// Apply a reveal timer tick.
    pub fn on_tick(&mut self, tick: RevealTick) -> TickOutcome {
        let outcome = self.reveal.tick(tick);
        if outcome != TickOutcome::Stale {
            self.publish();
        }
        outcome
    }

    /// Change the presentation font; the caret is re-measured immediately.
    pub fn on_font_change(&mut self, font: Font) {
        self.reveal.set_font(font);
        self.publish();
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// The current view state.
    pub fn snapshot(&self) -> ViewSnapshot {
        build_snapshot(&self.selection, &self.reveal, &self.ledger, &self.vault)
    }

    /// Receive a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.publisher.subscribe()
    }

    fn publish(&self) {
        self.publisher.send_replace(self.snapshot());
    }
}

fn build_snapshot(
    selection: &SelectionState,
    reveal: &TextRevealEngine,
    ledger: &QueryLedger,
    vault: &VaultStore,
) -> ViewSnapshot {
    let queries = selection
        .selection()
        .character
        .as_ref()
        .map(|c| ledger.texts_for(c.id))
        .unwrap_or_default();

    ViewSnapshot {
        selection: selection.selection().clone(),
        description: selection.description(),
        theme: selection.theme(),
        reveal: RevealView::from(reveal.session()),
        queries,
        vault: vault.list().to_vec(),
        vault_is_empty: vault.is_empty(),
    }
}

fn declined(reason: Declined) -> Declined {
    warn!(%reason, "event declined");
    reason
}
