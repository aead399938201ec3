//! Headline word switcher ("Find your ideal tour" / "... guide").

use crate::scheduler::{Scheduler, TimerId};
use std::time::Duration;
use tracing::{debug, trace};
use unicode_width::UnicodeWidthStr;

/// Timer event scheduled by a [`WordSwitcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchTimer;

/// Cycles through a fixed list of words on a repeating interval.
#[derive(Debug)]
pub struct WordSwitcher {
    words: Vec<String>,
    index: usize,
    interval: Option<TimerId>,
}

impl WordSwitcher {
    /// Create the switcher and start its interval.
    ///
    /// With fewer than two words there is nothing to switch and no timer is
    /// scheduled.
    pub fn mount<E>(words: Vec<String>, period: Duration, timers: &mut Scheduler<E>) -> Self
    where
        E: From<SwitchTimer> + Clone,
    {
        let interval = if words.len() > 1 {
            Some(timers.schedule_every(period, E::from(SwitchTimer)))
        } else {
            None
        };
        debug!(words = words.len(), ?period, "word switcher mounted");
        Self {
            words,
            index: 0,
            interval,
        }
    }

    /// The word currently shown.
    pub fn current(&self) -> &str {
        self.words.get(self.index).map_or("", String::as_str)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Display width of the widest word, for a layout that does not jump
    /// when the word changes.
    pub fn max_width(&self) -> usize {
        self.words.iter().map(|w| w.width()).max().unwrap_or(0)
    }

    /// The current word padded to [`Self::max_width`].
    pub fn padded(&self) -> String {
        let word = self.current();
        let pad = self.max_width().saturating_sub(word.width());
        format!("{word}{}", " ".repeat(pad))
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Handle a fired timer. Returns `false` if the timer is not ours.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.interval != Some(id) {
            trace!(?id, "stale switch timer");
            return false;
        }
        self.index = (self.index + 1) % self.words.len();
        true
    }

    /// Stop switching. Safe to call more than once.
    pub fn dispose<E: Clone>(&mut self, timers: &mut Scheduler<E>) {
        if let Some(id) = self.interval.take() {
            timers.cancel(id);
            debug!("word switcher disposed");
        }
    }
}
