//! Test utilities for guidely-tui rendering and integration tests.

use crate::app::App;
use crate::screens::render_app;
use guidely_engine::{CannedResponder, Config, FixedDelays, HeroPage, ManualClock};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

pub use crate::headless::buffer_to_string;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(TEST_WIDTH, TEST_HEIGHT)).expect("Failed to create test terminal")
}

/// Create an app on a manual clock with the shortest delays and a seeded bot.
///
/// The clock is returned so tests can move time forward before `App::tick`.
pub fn create_test_app() -> (ManualClock, App) {
    let config = Config::default();
    let clock = ManualClock::new();
    let page = HeroPage::mount(
        &config,
        Box::new(clock.clone()),
        Box::new(FixedDelays::min()),
        Box::new(CannedResponder::seeded(config.responses.clone(), 7)),
    );
    (clock, App::with_page(page))
}

/// Render the app to a buffer and return it as a string.
pub fn render_app_to_string(app: &App) -> String {
    render_app_to_string_sized(app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render the app with custom dimensions.
pub fn render_app_to_string_sized(app: &App, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    render_app(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Screen;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_create_test_app() {
        let (_clock, app) = create_test_app();
        assert_eq!(app.screen, Screen::Hero);
        assert!(app.page.is_mounted());
        assert_eq!(app.page.pending_timers(), 3);
    }
}
