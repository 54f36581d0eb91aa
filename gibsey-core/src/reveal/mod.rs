//! Typewriter-style text reveal.
//!
//! [`TextRevealEngine`] reveals one character of its source text per tick
//! and keeps a caret offset equal to the measured width of the revealed
//! prefix. Only the most recent `start` is ever live: starting again
//! cancels the previous schedule before creating a new one, and ticks
//! carrying an older [`SessionId`] are ignored.

pub mod metrics;
pub mod ticker;

pub use metrics::{Font, FontMetrics, MonospaceMetrics};
pub use ticker::{RevealTick, SessionId, TickHandle, TickScheduler, TokioTicker};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

/// Default delay between revealed characters.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(30);

/// Result of applying a tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One more character is visible.
    Advanced,
    /// The last character became visible; the session is finished.
    Completed,
    /// The tick belongs to a superseded, cancelled, or finished session.
    Stale,
}

/// State of one reveal run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevealSession {
    pub id: SessionId,
    pub source_text: String,
    /// Number of characters currently visible.
    pub revealed_len: usize,
    /// Total number of characters in `source_text`.
    pub total_len: usize,
    /// Rendered width of the visible prefix under the active font.
    pub caret_offset: f32,
    pub running: bool,
}

impl RevealSession {
    fn idle() -> Self {
        Self {
            id: SessionId(0),
            source_text: String::new(),
            revealed_len: 0,
            total_len: 0,
            caret_offset: 0.0,
            running: false,
        }
    }

    /// The visible prefix of the source text.
    pub fn revealed_text(&self) -> &str {
        let end = self
            .source_text
            .char_indices()
            .nth(self.revealed_len)
            .map(|(i, _)| i)
            .unwrap_or(self.source_text.len());
        &self.source_text[..end]
    }

    pub fn is_complete(&self) -> bool {
        self.revealed_len == self.total_len
    }
}

/// Drives reveal sessions and their caret offset.
pub struct TextRevealEngine {
    session: RevealSession,
    next_id: u64,
    interval: Duration,
    font: Font,
    metrics: Arc<dyn FontMetrics>,
    scheduler: Box<dyn TickScheduler>,
    handle: Option<TickHandle>,
}

impl TextRevealEngine {
    pub fn new(
        scheduler: Box<dyn TickScheduler>,
        metrics: Arc<dyn FontMetrics>,
        font: Font,
    ) -> Self {
        Self {
            session: RevealSession::idle(),
            next_id: 1,
            interval: DEFAULT_TICK_INTERVAL,
            font,
            metrics,
            scheduler,
            handle: None,
        }
    }

    /// Set the delay between revealed characters for future sessions.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn session(&self) -> &RevealSession {
        &self.session
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Begin revealing `text` from the first character.
    ///
    /// Any running session is cancelled first. Empty text completes
    /// immediately without scheduling a tick.
    pub fn start(&mut self, text: impl Into<String>) -> SessionId {
        if self.session.running {
            debug!(superseded = %self.session.id, "superseding reveal");
        }
        self.cancel();

        let id = SessionId(self.next_id);
        self.next_id += 1;

        let source_text = text.into();
        let total_len = source_text.chars().count();
        self.session = RevealSession {
            id,
            source_text,
            revealed_len: 0,
            total_len,
            caret_offset: 0.0,
            running: total_len > 0,
        };
        self.recompute_caret();

        if self.session.running {
            self.handle = Some(self.scheduler.schedule(id, self.interval));
        }
        debug!(session = %id, chars = total_len, "reveal started");
        id
    }

    /// Stop further progress. The visible prefix is left as it is.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
        self.session.running = false;
    }

    /// Apply one timer firing.
    pub fn tick(&mut self, tick: RevealTick) -> TickOutcome {
        if tick.session != self.session.id || !self.session.running {
            return TickOutcome::Stale;
        }

        self.session.revealed_len += 1;
        self.recompute_caret();

        if self.session.is_complete() {
            self.cancel();
            debug!(session = %tick.session, "reveal completed");
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced
        }
    }

    /// Switch fonts and re-measure the caret immediately.
    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.recompute_caret();
    }

    /// Swap the measurement capability and re-measure the caret.
    pub fn set_metrics(&mut self, metrics: Arc<dyn FontMetrics>) {
        self.metrics = metrics;
        self.recompute_caret();
    }

    fn recompute_caret(&mut self) {
        let width = self
            .metrics
            .measure(self.session.revealed_text(), &self.font);
        self.session.caret_offset = width;
    }
}

impl std::fmt::Debug for TextRevealEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRevealEngine")
            .field("session", &self.session)
            .field("interval", &self.interval)
            .field("font", &self.font)
            .field("handle", &self.handle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualTicker;

    fn engine() -> (TextRevealEngine, ManualTicker) {
        let ticker = ManualTicker::new();
        let engine = TextRevealEngine::new(
            Box::new(ticker.clone()),
            Arc::new(MonospaceMetrics::default()),
            Font::terminal(),
        );
        (engine, ticker)
    }

    #[test]
    fn test_reveal_runs_to_completion() {
        let (mut engine, ticker) = engine();
        engine.start("abc");
        assert_eq!(engine.session().revealed_len, 0);
        assert!(engine.session().running);

        let mut lengths = Vec::new();
        while let Some(tick) = ticker.fire() {
            let outcome = engine.tick(tick);
            lengths.push(engine.session().revealed_len);
            if outcome == TickOutcome::Completed {
                break;
            }
        }

        assert_eq!(lengths, vec![1, 2, 3]);
        assert_eq!(engine.session().revealed_text(), "abc");
        assert!(!engine.session().running);
        assert!(ticker.live_session().is_none());
    }

    #[test]
    fn test_empty_text_completes_immediately() {
        let (mut engine, ticker) = engine();
        engine.start("");
        assert_eq!(engine.session().revealed_len, 0);
        assert!(!engine.session().running);
        assert!(ticker.scheduled().is_empty());
    }

    #[test]
    fn test_start_supersedes_running_session() {
        let (mut engine, ticker) = engine();
        let first = engine.start("first text");
        engine.tick(ticker.fire().unwrap());
        engine.tick(ticker.fire().unwrap());

        let second = engine.start("second");
        assert_ne!(first, second);
        assert_eq!(ticker.cancelled(), vec![first]);
        assert_eq!(engine.session().revealed_len, 0);
        assert_eq!(engine.session().source_text, "second");

        // A tick already queued for the old session changes nothing.
        assert_eq!(engine.tick(RevealTick { session: first }), TickOutcome::Stale);
        assert_eq!(engine.session().revealed_len, 0);
    }

    #[test]
    fn test_restart_same_text_from_zero() {
        let (mut engine, ticker) = engine();
        engine.start("same");
        engine.tick(ticker.fire().unwrap());
        engine.tick(ticker.fire().unwrap());

        engine.start("same");
        assert_eq!(engine.session().revealed_len, 0);
        assert!(engine.session().running);
    }

    #[test]
    fn test_cancel_keeps_prefix() {
        let (mut engine, ticker) = engine();
        let id = engine.start("hello");
        engine.tick(ticker.fire().unwrap());
        engine.tick(ticker.fire().unwrap());

        engine.cancel();
        assert_eq!(engine.session().revealed_text(), "he");
        assert!(!engine.session().running);
        assert_eq!(engine.tick(RevealTick { session: id }), TickOutcome::Stale);
        assert_eq!(engine.session().revealed_len, 2);
    }

    #[test]
    fn test_caret_tracks_prefix_and_font() {
        let (mut engine, ticker) = engine();
        engine.start("日本語");
        engine.tick(ticker.fire().unwrap());
        assert_eq!(engine.session().caret_offset, 2.0);

        engine.set_font(Font::new("terminal", 3.0));
        assert_eq!(engine.session().caret_offset, 6.0);

        // Re-measuring without changes is idempotent.
        engine.set_font(Font::new("terminal", 3.0));
        assert_eq!(engine.session().caret_offset, 6.0);
    }

    #[test]
    fn test_caret_uses_injected_metrics() {
        let (mut engine, ticker) = engine();
        engine.set_metrics(Arc::new(|text: &str, _font: &Font| text.len() as f32 * 7.5));
        engine.start("xy");
        engine.tick(ticker.fire().unwrap());
        assert_eq!(engine.session().caret_offset, 7.5);
    }

    #[test]
    fn test_revealed_text_is_char_safe() {
        let (mut engine, ticker) = engine();
        engine.start("é!");
        engine.tick(ticker.fire().unwrap());
        assert_eq!(engine.session().revealed_text(), "é");
    }
}
