//! guidely-tui: Terminal UI for the guidely hero section
//!
//! This crate provides the TUI layer for guidely, including:
//! - The hero screen with the animated search placeholder
//! - The chat view the search box turns into
//! - Shared widgets (status bar, text input, chat bubbles)
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

pub use app::{App, Screen};
pub use event::{Action, Event, EventHandler};
pub use guidely_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use guidely_engine::Config;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tracing::{debug, info};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit. The hero page is unmounted before returning, so no timers outlive
/// the screen.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let mut events = EventHandler::new(config.tick_rate());
    info!(tick_rate_ms = config.tick_rate_ms, "tui started");

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // An error exit skips App::quit
    app.page.unmount();
    terminal.show_cursor()?;
    info!(turns = app.page.turns().len(), "tui stopped");

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            screens::render_app(app, area, frame.buffer_mut());
        })?;

        if app.should_quit {
            break;
        }

        let Some(event) = events.next().await else {
            debug!("event channel closed");
            break;
        };

        match event {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => app.handle_action(Action::Up),
                MouseEventKind::ScrollDown => app.handle_action(Action::Down),
                _ => {}
            },
            Event::Tick => app.tick(),
            Event::Resize(width, height) => debug!(width, height, "terminal resized"),
        }
    }

    Ok(())
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
