//! Reading-surface state machine for the Gibsey hypertext.
//!
//! This crate provides:
//! - The chapter/character catalog and page library
//! - A cancellable, time-paced text reveal with a measured caret
//! - Selection state and theme derivation
//! - Per-character query ledgers and the bookmark vault
//! - `InteractionController`, which ties them together behind one event API
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use gibsey_core::{Catalog, CharacterId, InteractionController, PageLibrary, ReaderConfig, TokioTicker};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (ticker, mut ticks) = TokioTicker::channel();
//!     let mut controller = InteractionController::new(
//!         Arc::new(Catalog::gibsey()),
//!         Arc::new(PageLibrary::new()),
//!         &ReaderConfig::default(),
//!         Box::new(ticker),
//!     );
//!
//!     controller.on_select_character(CharacterId(2)).unwrap();
//!     while let Some(tick) = ticks.recv().await {
//!         if controller.on_tick(tick) == gibsey_core::TickOutcome::Completed {
//!             break;
//!         }
//!     }
//!     println!("{}", controller.snapshot().reveal.revealed_text);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod controller;
pub mod ledger;
pub mod pages;
pub mod reveal;
pub mod selection;
pub mod testing;
pub mod vault;

// Primary public API
pub use catalog::{Catalog, CatalogError, Chapter, ChapterId, Character, CharacterId, HexColor, Symbol};
pub use config::{ConfigError, ReaderConfig};
pub use controller::{
    DeclineKind, Declined, InteractionController, RevealView, ScrollDirection, ScrollHint,
    ViewSnapshot,
};
pub use ledger::{QueryEntry, QueryLedger, QueryOutcome};
pub use pages::{PageError, PageId, PageLibrary};
pub use reveal::{
    Font, FontMetrics, MonospaceMetrics, RevealSession, RevealTick, SessionId, TextRevealEngine,
    TickHandle, TickOutcome, TickScheduler, TokioTicker,
};
pub use selection::{Axis, DescriptionSource, Selection, SelectionState, Theme, ThemePolicy, ThemeSource};
pub use vault::{VaultEntry, VaultId, VaultStore, VaultTarget, VaultToggle};
