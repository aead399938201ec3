//! Reusable widgets for the guidely TUI.

pub mod bubble;
pub mod status_bar;
pub mod text_input;

pub use bubble::{bubble_lines, Align};
pub use status_bar::{KeyHint, StatusBar};
pub use text_input::TextInput;
