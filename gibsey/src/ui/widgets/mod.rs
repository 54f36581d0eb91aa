//! TUI widgets for the reader

pub mod input;
pub mod ledger;
pub mod nav_list;
pub mod reveal;

pub use input::QueryBox;
pub use ledger::LedgerWidget;
pub use nav_list::{NavItem, NavListWidget};
pub use reveal::RevealWidget;
