//! Application state and update logic for the guidely TUI.

use crate::event::{key_to_action, Action};
use crossterm::event::KeyEvent;
use guidely_engine::{Config, ConversationMode, HeroPage};

/// The current screen being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Hero,
    QuitConfirm,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Current screen.
    pub screen: Screen,

    /// The hero section being rendered.
    pub page: HeroPage,

    /// Transcript scroll, in lines up from the newest message.
    pub transcript_scroll: usize,
}

impl App {
    /// Create an app on the wall clock.
    pub fn new(config: &Config) -> Self {
        Self::with_page(HeroPage::with_system_clock(config))
    }

    /// Create an app around an already mounted page.
    pub fn with_page(page: HeroPage) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            screen: Screen::Hero,
            page,
            transcript_scroll: 0,
        }
    }

    /// Advance animations and pending replies.
    pub fn tick(&mut self) {
        self.page.advance();
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let typing = self.screen == Screen::Hero && !self.show_help && self.page.is_focused();
        self.handle_action(key_to_action(key, typing));
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        // Any key closes the help overlay, quit included
        if self.show_help {
            if action != Action::None {
                self.show_help = false;
            }
            return;
        }

        match self.screen {
            Screen::Hero => self.handle_hero_action(action),
            Screen::QuitConfirm => match action {
                Action::Select | Action::Quit | Action::Type('y') => self.quit(),
                Action::Back | Action::Type('n') => self.screen = Screen::Hero,
                _ => {}
            },
        }
    }

    fn handle_hero_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.screen = Screen::QuitConfirm,
            Action::Help => self.show_help = true,
            Action::Back => {
                if self.page.is_focused() {
                    self.page.blur();
                } else {
                    self.screen = Screen::QuitConfirm;
                }
            }
            Action::ToggleFocus => {
                if self.page.is_focused() {
                    self.page.blur();
                } else {
                    self.page.focus();
                }
            }
            Action::Type(c) => {
                self.page.focus();
                self.page.insert_char(c);
            }
            Action::Backspace => self.page.backspace(),
            Action::Select => {
                if self.page.submit() {
                    self.transcript_scroll = 0;
                }
            }
            Action::Up => {
                if self.page.mode() == ConversationMode::Chat {
                    self.transcript_scroll = self.transcript_scroll.saturating_add(1);
                }
            }
            Action::Down => self.transcript_scroll = self.transcript_scroll.saturating_sub(1),
            Action::None => {}
        }
    }

    /// Unmount the page and stop.
    pub fn quit(&mut self) {
        self.page.unmount();
        self.should_quit = true;
    }
}
