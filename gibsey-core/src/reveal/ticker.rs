//! Cancellable repeating ticks that drive a reveal.
//!
//! A scheduler never touches reveal state itself. It delivers
//! [`RevealTick`]s to whoever owns the engine, which applies them on its
//! own thread of control.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

const MIN_TICK: Duration = Duration::from_millis(1);

/// Identifies one reveal session. Increases with every `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One timer firing for a reveal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTick {
    pub session: SessionId,
}

/// Handle to a scheduled tick stream. Cancels on `cancel()` or drop.
pub struct TickHandle {
    session: SessionId,
    on_cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(session: SessionId, on_cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            session,
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn cancel(mut self) {
        self.fire_cancel();
    }

    fn fire_cancel(&mut self) {
        if let Some(on_cancel) = self.on_cancel.take() {
            on_cancel();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.fire_cancel();
    }
}

impl fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickHandle")
            .field("session", &self.session)
            .field("live", &self.on_cancel.is_some())
            .finish()
    }
}

/// Schedules repeating ticks for a reveal session.
pub trait TickScheduler: Send {
    fn schedule(&mut self, session: SessionId, every: Duration) -> TickHandle;
}

/// Drives ticks from a Tokio interval and delivers them over a channel.
///
/// `schedule` must be called from within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<RevealTick>,
}

impl TokioTicker {
    pub fn new(tx: mpsc::UnboundedSender<RevealTick>) -> Self {
        Self { tx }
    }

    /// Create a ticker together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RevealTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl TickScheduler for TokioTicker {
    fn schedule(&mut self, session: SessionId, every: Duration) -> TickHandle {
        let tx = self.tx.clone();
        // Tokio intervals reject a zero period.
        let every = every.max(MIN_TICK);
        let task = tokio::spawn(async move {
            // First unit appears one interval after start, not immediately.
            let mut interval = time::interval_at(Instant::now() + every, every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(RevealTick { session }).is_err() {
                    trace!(%session, "tick receiver dropped");
                    break;
                }
            }
        });

        TickHandle::new(session, move || task.abort())
    }
}
