//! UI module for the reader TUI

pub mod render;
pub mod theme;
pub mod widgets;

pub use render::{FocusedPanel, Overlay};
