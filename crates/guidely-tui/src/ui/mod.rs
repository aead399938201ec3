//! UI module for the guidely TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

pub use layout::*;
