//! The hero section as one unit: field, placeholder, headline and chat.
//!
//! [`HeroPage`] owns the only [`Scheduler`] and routes each fired timer back
//! to the component that scheduled it. Hosts feed it field events and call
//! [`HeroPage::advance`] regularly; everything else is read-only.

use crate::config::Config;
use crate::conversation::{
    CannedResponder, ConversationController, ConversationMode, ConversationTurn, Responder,
    ResponseTimer,
};
use crate::delay::{DelaySource, ThreadRngDelays};
use crate::scheduler::{Clock, Scheduler, SystemClock};
use crate::switcher::{SwitchTimer, WordSwitcher};
use crate::typewriter::{FieldSignal, PhraseSet, Typewriter, TypewriterTimer};
use tracing::{debug, warn};

/// Every timer the hero section schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTimer {
    Placeholder(TypewriterTimer),
    Headline(SwitchTimer),
    Response(ResponseTimer),
}

impl From<TypewriterTimer> for PageTimer {
    fn from(timer: TypewriterTimer) -> Self {
        Self::Placeholder(timer)
    }
}

impl From<SwitchTimer> for PageTimer {
    fn from(timer: SwitchTimer) -> Self {
        Self::Headline(timer)
    }
}

impl From<ResponseTimer> for PageTimer {
    fn from(timer: ResponseTimer) -> Self {
        Self::Response(timer)
    }
}

/// The hero section of the landing page.
#[derive(Debug)]
pub struct HeroPage {
    timers: Scheduler<PageTimer>,
    placeholder: Typewriter,
    headline: WordSwitcher,
    conversation: ConversationController,
    chat_placeholder: String,
    focused: bool,
    mounted: bool,
}

impl HeroPage {
    /// Mount the hero section and start its animations.
    pub fn mount(
        config: &Config,
        clock: Box<dyn Clock>,
        delays: Box<dyn DelaySource>,
        responder: Box<dyn Responder>,
    ) -> Self {
        if config.phrases.is_empty() {
            warn!("no phrases configured, placeholder shows the prefix only");
        }
        let mut timers = Scheduler::new(clock);
        let placeholder = Typewriter::mount(
            config.prefix.clone(),
            PhraseSet::new(config.phrases.iter().cloned()),
            config.timing,
            delays,
            &mut timers,
        );
        let headline = WordSwitcher::mount(
            config.headline_words.clone(),
            config.headline_interval(),
            &mut timers,
        );
        let conversation = ConversationController::new(config.response_latency(), responder);

        debug!(pending = timers.pending(), "hero page mounted");
        Self {
            timers,
            placeholder,
            headline,
            conversation,
            chat_placeholder: config.chat_placeholder.clone(),
            focused: false,
            mounted: true,
        }
    }

    /// Mount on the wall clock with random delays and the canned responder.
    pub fn with_system_clock(config: &Config) -> Self {
        Self::mount(
            config,
            Box::new(SystemClock::new()),
            Box::new(ThreadRngDelays),
            Box::new(CannedResponder::new(config.responses.clone())),
        )
    }

    /// Fire every timer that has come due. Returns how many fired.
    pub fn advance(&mut self) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.timers.fire_next() {
            fired += 1;
            match timer.event {
                PageTimer::Placeholder(event) => {
                    self.placeholder.on_timer(timer.id, event, &mut self.timers);
                }
                PageTimer::Headline(_) => {
                    self.headline.on_timer(timer.id);
                }
                PageTimer::Response(_) => {
                    self.conversation.on_timer(timer.id);
                }
            }
        }
        fired
    }

    /// The host field gained keyboard focus.
    pub fn focus(&mut self) {
        self.advance();
        if !self.focused {
            self.focused = true;
            self.placeholder
                .observe(FieldSignal::FocusGained, &mut self.timers);
        }
    }

    /// The host field lost keyboard focus.
    pub fn blur(&mut self) {
        self.advance();
        if self.focused {
            self.focused = false;
            self.placeholder.observe(FieldSignal::FocusLost, &mut self.timers);
        }
    }

    /// Replace the field's content.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.advance();
        self.conversation.set_input(text);
        self.content_changed();
    }

    /// Append a character to the field.
    pub fn insert_char(&mut self, ch: char) {
        self.advance();
        self.conversation.input_mut().push(ch);
        self.content_changed();
    }

    /// Remove the last character of the field.
    pub fn backspace(&mut self) {
        self.advance();
        self.conversation.input_mut().pop();
        self.content_changed();
    }

    /// Submit the field's content.
    ///
    /// Returns `true` if a turn was appended. The first such submission moves
    /// the page into chat mode and unmounts the search-only widgets.
    pub fn submit(&mut self) -> bool {
        self.advance();
        let was_search = self.conversation.mode() == ConversationMode::Search;
        if self.conversation.submit_input(&mut self.timers).is_none() {
            return false;
        }

        if was_search {
            self.placeholder.dispose(&mut self.timers);
            self.headline.dispose(&mut self.timers);
            debug!("hero page entered chat mode");
        }
        self.content_changed();
        true
    }

    /// Release every timer. Nothing changes after this, however far the clock
    /// moves.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.placeholder.dispose(&mut self.timers);
        self.headline.dispose(&mut self.timers);
        self.conversation.dispose(&mut self.timers);
        self.mounted = false;
        debug!(pending = self.timers.pending(), "hero page unmounted");
    }

    /// Placeholder to show in the field right now.
    pub fn placeholder(&self) -> String {
        match self.conversation.mode() {
            ConversationMode::Search => self.placeholder.text(),
            ConversationMode::Chat if self.conversation.input().is_empty() => {
                self.chat_placeholder.clone()
            }
            ConversationMode::Chat => String::new(),
        }
    }

    /// The typewriter behind the search placeholder.
    pub fn typewriter(&self) -> &Typewriter {
        &self.placeholder
    }

    pub fn headline(&self) -> &WordSwitcher {
        &self.headline
    }

    /// The headline word currently shown.
    pub fn headline_word(&self) -> &str {
        self.headline.current()
    }

    pub fn mode(&self) -> ConversationMode {
        self.conversation.mode()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        self.conversation.turns()
    }

    pub fn is_pending(&self) -> bool {
        self.conversation.is_pending()
    }

    pub fn input(&self) -> &str {
        self.conversation.input()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of timers still scheduled.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    fn content_changed(&mut self) {
        let content = self.conversation.input().to_string();
        self.placeholder
            .observe(FieldSignal::ContentChanged(&content), &mut self.timers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Sender, DEFAULT_RESPONSES};
    use crate::delay::{DelayRange, FixedDelays, SeededDelays};
    use crate::scheduler::ManualClock;
    use crate::typewriter::Phase;

    fn page() -> (ManualClock, HeroPage) {
        let clock = ManualClock::new();
        let config = Config::default();
        let page = HeroPage::mount(
            &config,
            Box::new(clock.clone()),
            Box::new(FixedDelays::min()),
            Box::new(CannedResponder::seeded(config.responses.clone(), 5)),
        );
        (clock, page)
    }

    fn run(clock: &ManualClock, page: &mut HeroPage, ms: u64) {
        clock.advance_ms(ms);
        page.advance();
    }

    #[test]
    fn test_mount_starts_search_mode_animations() {
        let (clock, mut page) = page();
        assert_eq!(page.mode(), ConversationMode::Search);
        assert_eq!(page.placeholder(), "I want a guide |");
        assert_eq!(page.headline_word(), "tour");
        // Typing step, cursor blink, headline switch.
        assert_eq!(page.pending_timers(), 3);

        run(&clock, &mut page, 140);
        assert_eq!(page.placeholder(), "I want a guide in|");

        run(&clock, &mut page, 5_000);
        assert_eq!(page.headline_word(), "guide");
    }

    #[test]
    fn test_focus_freezes_placeholder_and_blur_resumes() {
        let (clock, mut page) = page();
        run(&clock, &mut page, 210);
        page.focus();
        let frozen = page.typewriter().state();

        run(&clock, &mut page, 30_000);
        assert_eq!(page.typewriter().state().char_index, frozen.char_index);
        assert_eq!(page.typewriter().phase(), Phase::Suspended);

        page.blur();
        run(&clock, &mut page, 70);
        assert_eq!(page.typewriter().state().char_index, frozen.char_index + 1);
    }

    #[test]
    fn test_typed_content_hides_placeholder() {
        let (_clock, mut page) = page();
        page.focus();
        page.insert_char('O');
        assert_eq!(page.input(), "O");
        assert_eq!(page.placeholder(), "");

        page.backspace();
        assert_eq!(page.input(), "");
        assert!(page.placeholder().starts_with("I want a guide "));
    }

    #[test]
    fn test_blank_submit_changes_nothing() {
        let (_clock, mut page) = page();
        page.set_input("   ");
        assert!(!page.submit());
        assert_eq!(page.mode(), ConversationMode::Search);
        assert!(page.turns().is_empty());
        assert_eq!(page.input(), "   ");
    }

    #[test]
    fn test_submit_switches_to_chat_and_replies() {
        let (clock, mut page) = page();
        page.focus();
        page.set_input("Oslo");
        assert!(page.submit());

        assert_eq!(page.mode(), ConversationMode::Chat);
        assert_eq!(page.input(), "");
        assert_eq!(page.turns().len(), 1);
        assert_eq!(page.turns()[0].text, "Oslo");
        assert!(page.is_pending());
        assert_eq!(page.placeholder(), "Type your message...");
        // Only the reply is left; the search widgets are gone.
        assert_eq!(page.pending_timers(), 1);
        assert!(page.typewriter().is_disposed());
        assert!(!page.headline().is_running());

        run(&clock, &mut page, 999);
        assert_eq!(page.turns().len(), 1);
        assert!(page.is_pending());

        run(&clock, &mut page, 1);
        assert_eq!(page.turns().len(), 2);
        assert_eq!(page.turns()[1].sender, Sender::Bot);
        assert!(DEFAULT_RESPONSES.contains(&page.turns()[1].text.as_str()));
        assert!(!page.is_pending());
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_focus_changes_in_chat_mode_schedule_nothing() {
        let (clock, mut page) = page();
        page.set_input("Oslo");
        assert!(page.submit());
        assert_eq!(page.pending_timers(), 1);

        page.blur();
        page.focus();
        page.blur();
        assert_eq!(page.pending_timers(), 1);
        assert!(!page.typewriter().has_pending_step());

        run(&clock, &mut page, 1_000);
        assert_eq!(page.turns().len(), 2);
        page.focus();
        page.blur();
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_mount_with_reversed_delay_range() {
        let clock = ManualClock::new();
        let mut config = Config::default();
        config.timing.typing = DelayRange {
            min_ms: 90,
            max_ms: 70,
        };
        let mut page = HeroPage::mount(
            &config,
            Box::new(clock.clone()),
            Box::new(SeededDelays::new(11)),
            Box::new(CannedResponder::seeded(config.responses.clone(), 11)),
        );

        run(&clock, &mut page, 69);
        assert_eq!(page.placeholder(), "I want a guide |");
        run(&clock, &mut page, 21);
        assert_eq!(page.placeholder(), "I want a guide i|");
    }

    #[test]
    fn test_two_rapid_submissions() {
        let (clock, mut page) = page();
        page.set_input("a");
        page.submit();
        run(&clock, &mut page, 100);
        page.set_input("b");
        page.submit();

        run(&clock, &mut page, 1_000);
        let senders: Vec<(Sender, &str)> = page
            .turns()
            .iter()
            .map(|t| (t.sender, t.text.as_str()))
            .collect();
        assert_eq!(senders.len(), 4);
        assert_eq!(senders[0], (Sender::User, "a"));
        assert_eq!(senders[1], (Sender::User, "b"));
        assert_eq!(senders[2].0, Sender::Bot);
        assert_eq!(senders[3].0, Sender::Bot);
    }

    #[test]
    fn test_unmount_during_pending_reply() {
        let (clock, mut page) = page();
        page.set_input("a");
        page.submit();
        page.unmount();
        page.unmount();

        assert_eq!(page.pending_timers(), 0);
        run(&clock, &mut page, 5_000);
        assert_eq!(page.turns().len(), 1);
        assert!(!page.is_pending());
        assert!(!page.is_mounted());
    }

    #[test]
    fn test_unmount_in_search_mode_releases_animations() {
        let (clock, mut page) = page();
        run(&clock, &mut page, 333);
        page.unmount();
        assert_eq!(page.pending_timers(), 0);

        let before = page.placeholder();
        page.blur();
        page.focus();
        page.blur();
        run(&clock, &mut page, 60_000);
        assert_eq!(page.placeholder(), before);
        assert_eq!(page.headline_word(), "tour");
    }

    #[test]
    fn test_chat_input_hides_chat_placeholder() {
        let (_clock, mut page) = page();
        page.set_input("Oslo");
        page.submit();
        page.insert_char('x');
        assert_eq!(page.placeholder(), "");
    }
}
