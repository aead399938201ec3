//! Typewriter placeholder engine.
//!
//! Types, pauses on, deletes and advances through a cyclic list of phrases,
//! appended to a fixed prefix, with an independent blinking cursor. The engine
//! owns its timer handles: at most one step is pending at any time, focus on
//! the host field freezes the machine in place, and [`Typewriter::dispose`]
//! releases everything.
//!
//! ```text
//!   Typing --(char_index == len)--> Pausing --> Deleting --(char_index == 0)--> Transitioning
//!     ^                                                                               |
//!     +------------------------------- next phrase ----------------------------------+
//! ```

use crate::delay::{DelayRange, DelaySource};
use crate::scheduler::{Scheduler, TimerId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

/// Cursor shown while the blink oscillator is on.
pub const CURSOR_GLYPH: char = '|';

/// Same-width stand-in for the cursor while the oscillator is off.
pub const CURSOR_BLANK: char = '\u{a0}';

/// Floor applied to every step delay so a zero range cannot spin.
const MIN_STEP: Duration = Duration::from_millis(1);

/// Ordered, immutable list of phrase endings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Phrase at `index`, taken modulo the set's length.
    pub fn get(&self, index: usize) -> Option<&str> {
        if self.phrases.is_empty() {
            return None;
        }
        Some(self.phrases[index % self.phrases.len()].as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }
}

/// Delay ranges driving the animation. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterTiming {
    /// Delay before each typed character.
    pub typing: DelayRange,
    /// Hold time on a fully typed phrase.
    pub pause: DelayRange,
    /// Delay before each deleted character.
    pub deleting: DelayRange,
    /// Gap between an emptied phrase and the next one.
    pub transition: DelayRange,
    /// Cursor blink period in milliseconds.
    pub blink_ms: u64,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            typing: DelayRange::new(70, 90),
            pause: DelayRange::new(1500, 2000),
            deleting: DelayRange::new(40, 60),
            transition: DelayRange::new(220, 400),
            blink_ms: 500,
        }
    }
}

/// Snapshot of the machine's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingState {
    /// Index into the phrase set (always below its length).
    pub phrase_index: usize,
    /// Number of characters of the current phrase shown.
    pub char_index: usize,
    pub is_deleting: bool,
    pub cursor_visible: bool,
    pub suspended: bool,
}

impl TypingState {
    fn initial() -> Self {
        Self {
            phrase_index: 0,
            char_index: 0,
            is_deleting: false,
            cursor_visible: true,
            suspended: false,
        }
    }
}

/// Which step the machine will take next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Pausing,
    Deleting,
    Transitioning,
    /// Frozen while the host field has focus.
    Suspended,
    /// Disposed, or nothing to animate.
    Idle,
}

/// Timer events scheduled by a [`Typewriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterTimer {
    /// Advance the typing state machine.
    Step,
    /// Toggle the cursor.
    Blink,
}

/// Notifications from the host text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSignal<'a> {
    FocusGained,
    FocusLost,
    /// The field's content changed; only its emptiness is read.
    ContentChanged(&'a str),
}

/// Animated placeholder for a text field.
pub struct Typewriter {
    prefix: String,
    phrases: PhraseSet,
    timing: TypewriterTiming,
    delays: Box<dyn DelaySource>,
    state: TypingState,
    has_content: bool,
    step: Option<TimerId>,
    blink: Option<TimerId>,
    disposed: bool,
}

impl Typewriter {
    /// Create the engine and start its timers.
    ///
    /// An empty phrase set yields an engine that shows the bare prefix and
    /// never schedules anything.
    pub fn mount<E>(
        prefix: impl Into<String>,
        phrases: PhraseSet,
        timing: TypewriterTiming,
        delays: Box<dyn DelaySource>,
        timers: &mut Scheduler<E>,
    ) -> Self
    where
        E: From<TypewriterTimer> + Clone,
    {
        let mut engine = Self {
            prefix: prefix.into(),
            phrases,
            timing,
            delays,
            state: TypingState::initial(),
            has_content: false,
            step: None,
            blink: None,
            disposed: false,
        };

        if engine.phrases.is_empty() {
            debug!("typewriter mounted without phrases; showing prefix only");
            return engine;
        }

        engine.blink = Some(timers.schedule_every(
            Duration::from_millis(engine.timing.blink_ms),
            E::from(TypewriterTimer::Blink),
        ));
        engine.schedule_step(timers);
        debug!(phrases = engine.phrases.len(), "typewriter mounted");
        engine
    }

    /// Current state snapshot.
    pub fn state(&self) -> TypingState {
        self.state
    }

    pub fn phrases(&self) -> &PhraseSet {
        &self.phrases
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether a typing step is waiting to fire.
    pub fn has_pending_step(&self) -> bool {
        self.step.is_some()
    }

    /// The phrase currently being typed or deleted.
    pub fn current_phrase(&self) -> &str {
        self.phrases.get(self.state.phrase_index).unwrap_or("")
    }

    /// Which step the machine takes next.
    pub fn phase(&self) -> Phase {
        if self.disposed || self.phrases.is_empty() {
            return Phase::Idle;
        }
        if self.state.suspended {
            return Phase::Suspended;
        }
        self.derived_phase()
    }

    /// The placeholder to render.
    ///
    /// Empty while the field has content. Otherwise the prefix, the typed
    /// part of the current phrase and a cursor cell whose width does not
    /// change as it blinks.
    pub fn text(&self) -> String {
        if self.has_content {
            return String::new();
        }

        let mut out = self.prefix.clone();
        if self.phrases.is_empty() {
            return out;
        }

        out.extend(self.current_phrase().chars().take(self.state.char_index));
        out.push(if self.state.cursor_visible {
            CURSOR_GLYPH
        } else {
            CURSOR_BLANK
        });
        out
    }

    /// React to a host field notification.
    pub fn observe<E>(&mut self, signal: FieldSignal<'_>, timers: &mut Scheduler<E>)
    where
        E: From<TypewriterTimer> + Clone,
    {
        match signal {
            FieldSignal::FocusGained => self.set_active(true, timers),
            FieldSignal::FocusLost => self.set_active(false, timers),
            FieldSignal::ContentChanged(content) => self.has_content = !content.is_empty(),
        }
    }

    /// Suspend (`true`) or resume (`false`) the typing machine.
    ///
    /// Suspending cancels the pending step and freezes the state in place.
    /// Resuming schedules the step that follows from the frozen state.
    pub fn set_active<E>(&mut self, active: bool, timers: &mut Scheduler<E>)
    where
        E: From<TypewriterTimer> + Clone,
    {
        if self.disposed || self.state.suspended == active {
            return;
        }

        self.state.suspended = active;
        if active {
            self.cancel_step(timers);
            trace!(state = ?self.state, "typewriter suspended");
        } else {
            self.schedule_step(timers);
            trace!(state = ?self.state, "typewriter resumed");
        }
    }

    pub fn suspend<E>(&mut self, timers: &mut Scheduler<E>)
    where
        E: From<TypewriterTimer> + Clone,
    {
        self.set_active(true, timers);
    }

    pub fn resume<E>(&mut self, timers: &mut Scheduler<E>)
    where
        E: From<TypewriterTimer> + Clone,
    {
        self.set_active(false, timers);
    }

    /// Handle a fired timer. Returns `false` for timers this engine no longer
    /// owns, which are ignored.
    pub fn on_timer<E>(
        &mut self,
        id: TimerId,
        timer: TypewriterTimer,
        timers: &mut Scheduler<E>,
    ) -> bool
    where
        E: From<TypewriterTimer> + Clone,
    {
        match timer {
            TypewriterTimer::Blink => {
                if self.blink != Some(id) {
                    trace!(?id, "stale blink timer");
                    return false;
                }
                self.state.cursor_visible = !self.state.cursor_visible;
                true
            }
            TypewriterTimer::Step => {
                if self.step != Some(id) {
                    trace!(?id, "stale typewriter step");
                    return false;
                }
                self.step = None;
                self.apply_step();
                self.schedule_step(timers);
                true
            }
        }
    }

    /// Cancel every timer. Safe to call more than once.
    pub fn dispose<E: Clone>(&mut self, timers: &mut Scheduler<E>) {
        if self.disposed {
            return;
        }
        self.cancel_step(timers);
        if let Some(id) = self.blink.take() {
            timers.cancel(id);
        }
        self.disposed = true;
        debug!("typewriter disposed");
    }

    fn phrase_len(&self) -> usize {
        self.current_phrase().chars().count()
    }

    fn derived_phase(&self) -> Phase {
        let len = self.phrase_len();
        match (self.state.is_deleting, self.state.char_index) {
            (false, i) if i < len => Phase::Typing,
            (false, _) => Phase::Pausing,
            (true, i) if i > 0 => Phase::Deleting,
            (true, _) => Phase::Transitioning,
        }
    }

    fn apply_step(&mut self) {
        match self.derived_phase() {
            Phase::Typing => self.state.char_index += 1,
            Phase::Pausing => self.state.is_deleting = true,
            Phase::Deleting => self.state.char_index -= 1,
            Phase::Transitioning => {
                self.state.is_deleting = false;
                self.state.phrase_index = (self.state.phrase_index + 1) % self.phrases.len();
                trace!(phrase = self.state.phrase_index, "typewriter advanced phrase");
            }
            Phase::Suspended | Phase::Idle => {}
        }
    }

    fn schedule_step<E>(&mut self, timers: &mut Scheduler<E>)
    where
        E: From<TypewriterTimer> + Clone,
    {
        self.cancel_step(timers);

        let range = match self.phase() {
            Phase::Typing => self.timing.typing,
            Phase::Pausing => self.timing.pause,
            Phase::Deleting => self.timing.deleting,
            Phase::Transitioning => self.timing.transition,
            Phase::Suspended | Phase::Idle => return,
        };
        let delay = self.delays.pick(range).max(MIN_STEP);
        self.step = Some(timers.schedule_once(delay, E::from(TypewriterTimer::Step)));
    }

    fn cancel_step<E: Clone>(&mut self, timers: &mut Scheduler<E>) {
        if let Some(id) = self.step.take() {
            timers.cancel(id);
        }
    }
}

impl std::fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typewriter")
            .field("prefix", &self.prefix)
            .field("phrases", &self.phrases)
            .field("state", &self.state)
            .field("has_content", &self.has_content)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::{FixedDelays, SeededDelays};
    use crate::scheduler::{Clock, Fired, ManualClock};

    const PREFIX: &str = "I want a guide ";

    struct Harness {
        clock: ManualClock,
        timers: Scheduler<TypewriterTimer>,
        engine: Typewriter,
    }

    impl Harness {
        fn new(phrases: &[&str]) -> Self {
            Self::with_delays(phrases, Box::new(FixedDelays::min()))
        }

        fn with_delays(phrases: &[&str], delays: Box<dyn DelaySource>) -> Self {
            let clock = ManualClock::new();
            let mut timers = Scheduler::new(Box::new(clock.clone()));
            let engine = Typewriter::mount(
                PREFIX,
                PhraseSet::new(phrases.iter().copied()),
                TypewriterTiming::default(),
                delays,
                &mut timers,
            );
            Self {
                clock,
                timers,
                engine,
            }
        }

        fn run_ms(&mut self, ms: u64) {
            self.clock.advance_ms(ms);
            while let Some(fired) = self.timers.fire_next() {
                self.engine.on_timer(fired.id, fired.event, &mut self.timers);
            }
        }

        /// Jump to the next pending timer and fire it.
        fn fire_one(&mut self) -> Option<Fired<TypewriterTimer>> {
            let deadline = self.timers.next_deadline()?;
            let gap = deadline.saturating_sub(self.clock.now());
            self.clock.advance(gap);
            let fired = self.timers.fire_next()?;
            self.engine.on_timer(fired.id, fired.event, &mut self.timers);
            Some(fired)
        }

        /// Fire timers until the next typing step has been applied.
        fn next_step(&mut self) -> TypingState {
            loop {
                let fired = self.fire_one().expect("engine stopped scheduling");
                if fired.event == TypewriterTimer::Step {
                    return self.engine.state();
                }
            }
        }

        fn focus(&mut self) {
            self.engine.observe(FieldSignal::FocusGained, &mut self.timers);
        }

        fn blur(&mut self) {
            self.engine.observe(FieldSignal::FocusLost, &mut self.timers);
        }
    }

    #[test]
    fn test_suspend_and_resume_directly() {
        let mut h = Harness::new(&["in Oslo"]);
        h.run_ms(70);
        let frozen = h.engine.state();

        h.engine.suspend(&mut h.timers);
        assert!(!h.engine.has_pending_step());
        h.run_ms(5_000);
        assert_eq!(h.engine.state().char_index, frozen.char_index);

        h.engine.resume(&mut h.timers);
        assert!(h.engine.has_pending_step());
        assert_eq!(h.next_step().char_index, frozen.char_index + 1);
    }

    #[test]
    fn test_initial_text_is_prefix_with_cursor() {
        let h = Harness::new(&["in Oslo"]);
        assert_eq!(h.engine.text(), format!("{PREFIX}|"));
        assert_eq!(h.engine.phase(), Phase::Typing);
        assert!(h.engine.has_pending_step());
    }

    #[test]
    fn test_types_one_character_per_step() {
        let mut h = Harness::new(&["in Oslo"]);
        h.run_ms(69);
        assert_eq!(h.engine.state().char_index, 0);
        h.run_ms(1);
        assert_eq!(h.engine.state().char_index, 1);
        assert_eq!(h.engine.text(), format!("{PREFIX}i|"));
        h.run_ms(70);
        assert_eq!(h.engine.state().char_index, 2);
    }

    #[test]
    fn test_full_phrase_cycle_timing() {
        // "abc": 3 x 70 typing, 1500 pause, 3 x 40 deleting, 220 transition.
        let mut h = Harness::new(&["abc", "de"]);

        h.run_ms(210);
        assert_eq!(h.engine.state().char_index, 3);
        assert_eq!(h.engine.phase(), Phase::Pausing);

        h.run_ms(1500);
        assert!(h.engine.state().is_deleting);
        assert_eq!(h.engine.phase(), Phase::Deleting);

        h.run_ms(120);
        assert_eq!(h.engine.state().char_index, 0);
        assert_eq!(h.engine.phase(), Phase::Transitioning);

        h.run_ms(219);
        assert_eq!(h.engine.state().phrase_index, 0);
        h.run_ms(1);
        let state = h.engine.state();
        assert_eq!(state.phrase_index, 1);
        assert!(!state.is_deleting);
        assert_eq!(h.engine.current_phrase(), "de");
    }

    #[test]
    fn test_char_index_stays_in_bounds_and_cycle_order_holds() {
        let phrases = ["in Oslo on the 15th of December", "in Munich", "x"];
        let mut h = Harness::with_delays(&phrases, Box::new(SeededDelays::new(3)));
        let mut prev = h.engine.state();

        for _ in 0..400 {
            let state = h.next_step();
            let len = phrases[state.phrase_index].chars().count();
            assert!(state.char_index <= len);

            if state.phrase_index == prev.phrase_index {
                match (prev.is_deleting, state.is_deleting) {
                    (false, false) => assert_eq!(state.char_index, prev.char_index + 1),
                    (false, true) => {
                        assert_eq!(prev.char_index, len);
                        assert_eq!(state.char_index, len);
                    }
                    (true, true) => assert_eq!(state.char_index + 1, prev.char_index),
                    (true, false) => panic!("stopped deleting without advancing"),
                }
            } else {
                assert_eq!(state.phrase_index, (prev.phrase_index + 1) % phrases.len());
                assert!(prev.is_deleting);
                assert_eq!(prev.char_index, 0);
                assert_eq!(state.char_index, 0);
                assert!(!state.is_deleting);
            }
            prev = state;
        }
    }

    #[test]
    fn test_cycle_closure_over_all_phrases() {
        let phrases = ["ab", "c", "def"];
        let mut h = Harness::new(&phrases);
        let start = h.engine.state().phrase_index;

        let mut transitions = 0;
        while transitions < phrases.len() {
            let before = h.engine.state().phrase_index;
            let after = h.next_step().phrase_index;
            if after != before {
                transitions += 1;
            }
        }
        assert_eq!(h.engine.state().phrase_index, start);
        assert_eq!(h.engine.state().char_index, 0);
    }

    #[test]
    fn test_step_delays_are_drawn_from_their_ranges() {
        let mut h = Harness::with_delays(&["abcd"], Box::new(SeededDelays::new(11)));
        let timing = TypewriterTiming::default();
        let mut last = h.timers.now();

        for _ in 0..60 {
            let range = match h.engine.phase() {
                Phase::Typing => timing.typing,
                Phase::Pausing => timing.pause,
                Phase::Deleting => timing.deleting,
                Phase::Transitioning => timing.transition,
                other => panic!("unexpected phase {other:?}"),
            };
            let fired = loop {
                let fired = h.fire_one().unwrap();
                if fired.event == TypewriterTimer::Step {
                    break fired;
                }
            };
            let gap = u64::try_from((fired.at - last).as_millis()).unwrap();
            assert!(range.contains(gap), "{gap}ms outside {range}");
            last = fired.at;
        }
    }

    #[test]
    fn test_focus_freezes_and_blur_resumes_from_same_point() {
        fn position(state: TypingState) -> (usize, usize, bool) {
            (state.phrase_index, state.char_index, state.is_deleting)
        }

        for steps_before_focus in [0, 1, 5, 7, 8, 14, 15, 16, 20] {
            let mut reference = Harness::new(&["in Oslo", "in Paris"]);
            for _ in 0..=steps_before_focus {
                reference.next_step();
            }

            let mut h = Harness::new(&["in Oslo", "in Paris"]);
            for _ in 0..steps_before_focus {
                h.next_step();
            }

            h.focus();
            let frozen = h.engine.state();
            assert!(frozen.suspended);
            assert!(!h.engine.has_pending_step());
            assert_eq!(h.engine.phase(), Phase::Suspended);

            h.run_ms(60_000);
            assert_eq!(position(h.engine.state()), position(frozen));

            h.blur();
            assert!(h.engine.has_pending_step());
            let resumed = h.next_step();
            assert_eq!(
                position(resumed),
                position(reference.engine.state()),
                "resume after {steps_before_focus} steps diverged"
            );
        }
    }

    #[test]
    fn test_repeated_focus_signals_are_harmless() {
        let mut h = Harness::new(&["abc"]);
        h.focus();
        h.focus();
        assert!(!h.engine.has_pending_step());
        h.blur();
        h.blur();
        assert!(h.engine.has_pending_step());
        // One step timer and one blink timer.
        assert_eq!(h.timers.pending(), 2);
    }

    #[test]
    fn test_content_hides_placeholder() {
        let mut h = Harness::new(&["in Oslo"]);
        h.run_ms(300);

        h.engine
            .observe(FieldSignal::ContentChanged("Par"), &mut h.timers);
        assert_eq!(h.engine.text(), "");
        h.run_ms(5_000);
        assert_eq!(h.engine.text(), "");

        h.engine
            .observe(FieldSignal::ContentChanged(""), &mut h.timers);
        assert!(h.engine.text().starts_with(PREFIX));
    }

    #[test]
    fn test_cursor_blinks_without_changing_width() {
        let mut h = Harness::new(&["in Oslo"]);
        h.focus();
        let on = h.engine.text();
        assert!(h.engine.state().cursor_visible);

        h.run_ms(500);
        let off = h.engine.text();
        assert!(!h.engine.state().cursor_visible);
        assert!(off.ends_with(CURSOR_BLANK));
        assert_eq!(on.chars().count(), off.chars().count());

        h.run_ms(500);
        assert!(h.engine.state().cursor_visible);
    }

    #[test]
    fn test_empty_phrase_set_shows_bare_prefix() {
        let mut h = Harness::new(&[]);
        assert_eq!(h.engine.text(), PREFIX);
        assert_eq!(h.engine.phase(), Phase::Idle);
        assert_eq!(h.timers.pending(), 0);

        h.run_ms(10_000);
        h.blur();
        h.focus();
        h.blur();
        assert_eq!(h.timers.pending(), 0);
        assert_eq!(h.engine.text(), PREFIX);
    }

    #[test]
    fn test_dispose_leaves_nothing_pending() {
        let mut h = Harness::new(&["abc"]);
        h.run_ms(1_000);
        h.engine.dispose(&mut h.timers);
        h.engine.dispose(&mut h.timers);

        assert_eq!(h.timers.pending(), 0);
        assert_eq!(h.engine.phase(), Phase::Idle);

        let before = h.engine.state();
        h.blur();
        h.run_ms(10_000);
        assert_eq!(h.engine.state(), before);
        assert_eq!(h.timers.pending(), 0);
    }

    #[test]
    fn test_stale_step_is_ignored() {
        let mut h = Harness::new(&["abc"]);
        let fired = loop {
            let fired = h.fire_one().unwrap();
            if fired.event == TypewriterTimer::Step {
                break fired;
            }
        };
        let before = h.engine.state();

        assert!(!h
            .engine
            .on_timer(fired.id, TypewriterTimer::Step, &mut h.timers));
        assert_eq!(h.engine.state(), before);
    }

    #[test]
    fn test_multibyte_phrases_count_characters() {
        let mut h = Harness::new(&["på Tromsø"]);
        for _ in 0..9 {
            h.next_step();
        }
        assert_eq!(h.engine.state().char_index, 9);
        assert_eq!(h.engine.phase(), Phase::Pausing);
        assert!(h.engine.text().contains("på Tromsø"));
    }
}
