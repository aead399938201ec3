//! Screen definitions for the guidely TUI.

pub mod hero;

use crate::app::{self, App};
use crate::ui::centered_fixed;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Render whatever the app currently shows, overlays included.
pub fn render_app(app: &App, area: Rect, buf: &mut Buffer) {
    match app.screen {
        app::Screen::Hero => hero::HeroScreen.render(app, area, buf),
        app::Screen::QuitConfirm => hero::QuitConfirmScreen.render(app, area, buf),
    }

    if app.show_help {
        render_help_overlay(area, buf);
    }
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Search
    Type              Focus the box and type
    Tab               Focus / unfocus the box
    Enter             Search / send
    Esc               Unfocus, then quit
    Up/Down           Scroll the chat
    q                 Quit (when not typing)
    ?                 Toggle this help

  [Press any key to close]
";

    let width = 50.min(area.width.saturating_sub(4));
    let height = 14.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
