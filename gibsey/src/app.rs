//! Main application state and logic

use gibsey_core::{
    Axis, ChapterId, CharacterId, Declined, InteractionController, QueryOutcome, RevealTick,
    ScrollDirection, ScrollHint, VaultToggle, ViewSnapshot,
};
use tokio::sync::watch;

use crate::draft::QueryDraft;
use crate::ui::{FocusedPanel, Overlay};

/// Scroll-hint units per terminal row.
const UNITS_PER_ROW: u32 = 20;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - typing a query
    Insert,
}

/// Main application state
pub struct App {
    pub controller: InteractionController,
    view: watch::Receiver<ViewSnapshot>,

    // UI state
    pub focused_panel: FocusedPanel,
    overlay: Option<Overlay>,
    pub chapter_cursor: usize,
    pub character_cursor: usize,
    pub vault_cursor: usize,
    pub ledger_scroll: usize,

    // Query input
    pub input_mode: InputMode,
    pub draft: QueryDraft,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: InteractionController) -> Self {
        let view = controller.subscribe();
        Self {
            controller,
            view,
            focused_panel: FocusedPanel::default(),
            overlay: None,
            chapter_cursor: 0,
            character_cursor: 0,
            vault_cursor: 0,
            ledger_scroll: 0,
            input_mode: InputMode::Normal,
            draft: QueryDraft::new(),
            status_message: Some("Press '?' for help".to_string()),
            should_quit: false,
        }
    }

    /// The latest published view.
    pub fn view(&self) -> ViewSnapshot {
        self.view.borrow().clone()
    }

    /// Apply a reveal tick from the timer.
    pub fn on_tick(&mut self, tick: RevealTick) {
        self.controller.on_tick(tick);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Cycle to next focused panel
    pub fn cycle_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Chapters => FocusedPanel::Characters,
            FocusedPanel::Characters => FocusedPanel::Vault,
            FocusedPanel::Vault => FocusedPanel::Chapters,
        };
    }

    /// Cycle to previous focused panel
    pub fn cycle_focus_reverse(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Chapters => FocusedPanel::Vault,
            FocusedPanel::Vault => FocusedPanel::Characters,
            FocusedPanel::Characters => FocusedPanel::Chapters,
        };
    }

    fn focused_len(&self) -> usize {
        match self.focused_panel {
            FocusedPanel::Chapters => self.controller.catalog().chapters().len(),
            FocusedPanel::Characters => self.controller.catalog().characters().len(),
            FocusedPanel::Vault => self.controller.vault().len(),
        }
    }

    fn focused_cursor(&mut self) -> &mut usize {
        match self.focused_panel {
            FocusedPanel::Chapters => &mut self.chapter_cursor,
            FocusedPanel::Characters => &mut self.character_cursor,
            FocusedPanel::Vault => &mut self.vault_cursor,
        }
    }

    /// Move the cursor of the focused list, clamped to its length.
    pub fn move_cursor(&mut self, down: bool) {
        let len = self.focused_len();
        let cursor = self.focused_cursor();
        *cursor = if down {
            (*cursor + 1).min(len.saturating_sub(1))
        } else {
            cursor.saturating_sub(1)
        };
    }

    /// Select the entry under the cursor of the focused list.
    pub fn activate(&mut self) {
        match self.focused_panel {
            FocusedPanel::Chapters => {
                let Some(id) = self
                    .controller
                    .catalog()
                    .chapters()
                    .get(self.chapter_cursor)
                    .map(|c| c.id)
                else {
                    return;
                };
                self.select_chapter(id);
            }
            FocusedPanel::Characters => {
                let Some(id) = self
                    .controller
                    .catalog()
                    .characters()
                    .get(self.character_cursor)
                    .map(|c| c.id)
                else {
                    return;
                };
                self.select_character(id);
            }
            FocusedPanel::Vault => {
                let Some(id) = self
                    .controller
                    .vault()
                    .list()
                    .get(self.vault_cursor)
                    .map(|e| e.id.clone())
                else {
                    return;
                };
                match self.controller.on_navigate_vault(&id) {
                    Ok(Some(_)) => self.clear_status(),
                    Ok(None) => self.set_status(format!("{id} does not open anything")),
                    Err(e) => self.set_status(e.to_string()),
                }
            }
        }
    }

    pub fn select_chapter(&mut self, id: ChapterId) {
        let result = self.controller.on_select_chapter(id);
        self.report(result);
    }

    pub fn select_character(&mut self, id: CharacterId) {
        let result = self.controller.on_select_character(id);
        if result.is_ok() {
            self.ledger_scroll = 0;
        }
        self.report(result);
    }

    pub fn next_page(&mut self) {
        match self.controller.on_next_page() {
            Ok(page) => self.set_status(format!("Page {page}")),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn previous_page(&mut self) {
        match self.controller.on_previous_page() {
            Ok(page) => self.set_status(format!("Page {page}")),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Bookmark or un-bookmark the page being read.
    pub fn toggle_vault_page(&mut self) {
        match self.controller.on_toggle_vault_page() {
            Some(VaultToggle::Added) => self.set_status("Saved to vault"),
            Some(VaultToggle::Removed) => {
                self.set_status("Removed from vault");
                let len = self.controller.vault().len();
                self.vault_cursor = self.vault_cursor.min(len.saturating_sub(1));
            }
            None => self.set_status("Open a page before saving it"),
        }
    }

    pub fn clear_character(&mut self) {
        self.controller.on_clear(Axis::Character);
        self.ledger_scroll = 0;
    }

    /// Scroll the query ledger by the controller's hint.
    pub fn scroll(&mut self, direction: ScrollDirection) {
        let hint = self.controller.on_scroll(direction);
        self.apply_scroll_hint(hint);
    }

    fn apply_scroll_hint(&mut self, hint: ScrollHint) {
        let rows = (hint.delta.unsigned_abs() / UNITS_PER_ROW).max(1) as usize;
        self.ledger_scroll = if hint.delta < 0 {
            self.ledger_scroll.saturating_sub(rows)
        } else {
            let max = self.view.borrow().queries.len().saturating_sub(1);
            (self.ledger_scroll + rows).min(max)
        };
    }

    // =========================================================================
    // Query input
    // =========================================================================

    pub fn enter_insert_mode(&mut self) {
        self.input_mode = InputMode::Insert;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Send the draft to the active character.
    pub fn submit_query(&mut self) {
        let Some(text) = self.draft.send() else {
            return;
        };

        match self.controller.on_submit_query(&text) {
            Ok(QueryOutcome::Recorded(n)) => {
                self.set_status(format!("Query {n} recorded"));
                self.ledger_scroll = self.view.borrow().queries.len().saturating_sub(1);
            }
            Ok(QueryOutcome::Ignored) => {}
            Err(e) => self.set_status(e.to_string()),
        }
    }

    // =========================================================================
    // Overlay and status
    // =========================================================================

    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    fn report(&mut self, result: Result<(), Declined>) {
        match result {
            Ok(()) => self.clear_status(),
            Err(e) => self.set_status(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gibsey_core::testing::{fixture_controller, run_reveal_to_end};
    use gibsey_core::PageId;

    fn app() -> (App, gibsey_core::testing::ManualTicker) {
        let (controller, ticker) = fixture_controller();
        (App::new(controller), ticker)
    }

    #[test]
    fn test_cursor_clamps_to_list() {
        let (mut app, _ticker) = app();
        app.focused_panel = FocusedPanel::Vault;
        app.move_cursor(true);
        assert_eq!(app.vault_cursor, 0);

        app.focused_panel = FocusedPanel::Characters;
        for _ in 0..40 {
            app.move_cursor(true);
        }
        assert_eq!(app.character_cursor, 15);
        app.move_cursor(false);
        assert_eq!(app.character_cursor, 14);
    }

    #[test]
    fn test_activate_character_starts_reveal() {
        let (mut app, ticker) = app();
        app.focused_panel = FocusedPanel::Characters;
        app.move_cursor(true);
        app.activate();

        run_reveal_to_end(&mut app.controller, &ticker);
        let view = app.view();
        assert_eq!(view.selection.character.map(|c| c.id), Some(CharacterId(1)));
        assert!(view.reveal.revealed_text.starts_with("London Fox"));
    }

    #[test]
    fn test_query_without_character_sets_status() {
        let (mut app, _ticker) = app();
        app.enter_insert_mode();
        app.draft.set("hello");
        app.submit_query();

        assert_eq!(
            app.status_message(),
            Some("Select a character before asking a question")
        );
        assert_eq!(app.draft.sent().next(), Some("hello"));
        assert!(app.draft.is_empty());
    }

    #[test]
    fn test_query_recorded_for_character() {
        let (mut app, _ticker) = app();
        app.select_character(CharacterId(4));
        app.draft.set("  who watches?  ");
        app.submit_query();

        assert_eq!(app.view().queries, vec!["who watches?"]);
        assert_eq!(app.status_message(), Some("Query 1 recorded"));
    }

    #[test]
    fn test_vault_page_toggle_and_navigation() {
        let (mut app, _ticker) = app();
        app.toggle_vault_page();
        assert_eq!(app.status_message(), Some("Open a page before saving it"));

        app.next_page();
        app.toggle_vault_page();
        app.next_page();
        assert_eq!(app.view().selection.page, Some(PageId(2)));

        app.focused_panel = FocusedPanel::Vault;
        app.activate();
        assert_eq!(app.view().selection.page, Some(PageId(1)));
    }

    #[test]
    fn test_scroll_hint_moves_ledger() {
        let (mut app, _ticker) = app();
        app.select_character(CharacterId(0));
        for q in ["a", "b", "c", "d", "e"] {
            app.draft.set(q);
            app.submit_query();
        }
        app.ledger_scroll = 0;

        app.scroll(ScrollDirection::Down);
        assert_eq!(app.ledger_scroll, 2);
        app.scroll(ScrollDirection::Down);
        app.scroll(ScrollDirection::Down);
        assert_eq!(app.ledger_scroll, 4);
        app.scroll(ScrollDirection::Up);
        assert_eq!(app.ledger_scroll, 2);
    }
}
