//! guidely-engine: Headless engine for the guidely hero section
//!
//! This crate provides the timing core behind the landing page hero, including:
//! - A cooperative timer queue with real and virtual clocks
//! - The typewriter placeholder engine and headline word switcher
//! - The search-to-chat conversation controller with a stub responder
//! - Configuration loading and validation

pub mod config;
pub mod conversation;
pub mod delay;
pub mod page;
pub mod scheduler;
pub mod switcher;
pub mod typewriter;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use conversation::{
    CannedResponder, ConversationController, ConversationMode, ConversationTurn, Responder,
    ResponseTimer, Sender, TurnId, DEFAULT_RESPONSES,
};
pub use delay::{DelayRange, DelaySource, FixedDelays, SeededDelays, ThreadRngDelays};
pub use page::{HeroPage, PageTimer};
pub use scheduler::{Clock, Fired, ManualClock, Scheduler, SystemClock, TimerId};
pub use switcher::{SwitchTimer, WordSwitcher};
pub use typewriter::{
    FieldSignal, Phase, PhraseSet, Typewriter, TypewriterTimer, TypewriterTiming, TypingState,
    CURSOR_BLANK, CURSOR_GLYPH,
};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
