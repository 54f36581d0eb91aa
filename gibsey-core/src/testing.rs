//! Testing utilities.
//!
//! - `ManualTicker` for driving reveals deterministically without a clock
//! - `fixture_pages` / `fixture_controller` for scripted scenarios

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::ReaderConfig;
use crate::controller::InteractionController;
use crate::pages::{PageId, PageLibrary};
use crate::reveal::{RevealTick, SessionId, TickHandle, TickScheduler};

#[derive(Debug, Default)]
struct TickerState {
    live: Option<SessionId>,
    scheduled: Vec<(SessionId, Duration)>,
    cancelled: Vec<SessionId>,
}

/// A scheduler that only ticks when told to.
///
/// Clones share state, so a test can keep one clone while the engine owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    state: Arc<Mutex<TickerState>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, TickerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A tick for the live session, if one is scheduled.
    pub fn fire(&self) -> Option<RevealTick> {
        self.state().live.map(|session| RevealTick { session })
    }

    /// The session currently scheduled, if any.
    pub fn live_session(&self) -> Option<SessionId> {
        self.state().live
    }

    /// Every schedule request so far, oldest first.
    pub fn scheduled(&self) -> Vec<(SessionId, Duration)> {
        self.state().scheduled.clone()
    }

    /// Every cancelled session so far, oldest first.
    pub fn cancelled(&self) -> Vec<SessionId> {
        self.state().cancelled.clone()
    }
}

impl TickScheduler for ManualTicker {
    fn schedule(&mut self, session: SessionId, every: Duration) -> TickHandle {
        {
            let mut state = self.state();
            state.live = Some(session);
            state.scheduled.push((session, every));
        }

        let shared = self.state.clone();
        TickHandle::new(session, move || {
            let mut state = shared.lock().unwrap_or_else(|e| e.into_inner());
            if state.live == Some(session) {
                state.live = None;
            }
            state.cancelled.push(session);
        })
    }
}

/// A small three-page book.
pub fn fixture_pages() -> PageLibrary {
    let mut pages = PageLibrary::new();
    pages.insert(PageId(1), "The first page of the book.");
    pages.insert(PageId(2), "A second page, slightly longer than the first.");
    pages.insert(PageId(12), "Page twelve, where the vault begins.");
    pages
}

/// A controller over the built-in catalog and [`fixture_pages`], driven by
/// a [`ManualTicker`].
pub fn fixture_controller() -> (InteractionController, ManualTicker) {
    let ticker = ManualTicker::new();
    let controller = InteractionController::new(
        Arc::new(Catalog::gibsey()),
        Arc::new(fixture_pages()),
        &ReaderConfig::default(),
        Box::new(ticker.clone()),
    );
    (controller, ticker)
}

/// Fire ticks until the live reveal finishes. Returns the number of ticks applied.
pub fn run_reveal_to_end(controller: &mut InteractionController, ticker: &ManualTicker) -> usize {
    let mut applied = 0;
    while let Some(tick) = ticker.fire() {
        controller.on_tick(tick);
        applied += 1;
    }
    applied
}
