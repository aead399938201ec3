//! Hero screen: animated search box that turns into a chat.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::Styles;
use crate::ui::widgets::{bubble_lines, Align, KeyHint, StatusBar, TextInput};
use crate::ui::{centered_column, centered_fixed, main_layout};
use guidely_engine::{ConversationMode, Sender};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const COLUMN_WIDTH: u16 = 72;

/// The hero section.
pub struct HeroScreen;

impl Screen for HeroScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        Block::default().style(Styles::default()).render(area, buf);
        let (main_area, status_area) = main_layout(area);
        let column = centered_column(COLUMN_WIDTH, main_area);

        match app.page.mode() {
            ConversationMode::Search => render_search(app, column, buf),
            ConversationMode::Chat => render_chat(app, column, buf),
        }

        render_status(app, status_area, buf);
    }
}

fn render_search(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // Headline
            Constraint::Length(1), // Subtitle
            Constraint::Length(1),
            Constraint::Length(3), // Search box
            Constraint::Min(0),
        ])
        .split(area);

    let headline = Line::from(vec![
        Span::styled("Find your ideal ", Styles::headline()),
        Span::styled(app.page.headline().padded(), Styles::headline_word()),
    ]);
    Paragraph::new(headline)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Line::from(Span::styled(
        "Just say where and when",
        Styles::dim(),
    )))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    render_input(app, chunks[4], buf);
}

fn render_chat(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    render_transcript(app, chunks[0], buf);
    render_input(app, chunks[1], buf);
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let width = usize::from(area.width);
    let mut lines: Vec<Line<'static>> = Vec::new();

    for turn in app.page.turns() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        let (align, style) = match turn.sender {
            Sender::User => (Align::Right, Styles::user_bubble()),
            Sender::Bot => (Align::Left, Styles::bot_bubble()),
        };
        lines.extend(bubble_lines(&turn.text, width, align, style));
    }

    if app.page.is_pending() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Guide is typing...", Styles::dim())));
    }

    // Scroll counts up from the newest line
    let height = usize::from(area.height);
    let max_scroll = lines.len().saturating_sub(height);
    let scroll = app.transcript_scroll.min(max_scroll);
    let start = lines.len().saturating_sub(height + scroll);
    let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();

    Paragraph::new(visible)
        .style(Styles::default())
        .render(area, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let focused = app.page.is_focused();
    let border = if focused {
        Styles::border_active()
    } else {
        Styles::border()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(Styles::default());

    let placeholder = app.page.placeholder();
    TextInput::new(app.page.input())
        .block(block)
        .focused(focused)
        .placeholder(&placeholder)
        .render(area, buf);
}

const SEARCH_HINTS: &[KeyHint] = &[
    KeyHint::new("Tab", "Focus"),
    KeyHint::new("?", "Help"),
    KeyHint::new("q", "Quit"),
];
const TYPING_HINTS: &[KeyHint] = &[KeyHint::new("Enter", "Search"), KeyHint::new("Esc", "Done")];
const CHAT_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter", "Send"),
    KeyHint::new("Up/Down", "Scroll"),
    KeyHint::new("Esc", "Back"),
];

fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    let (mode, hints) = match (app.page.mode(), app.page.is_focused()) {
        (ConversationMode::Search, false) => ("Search", SEARCH_HINTS),
        (ConversationMode::Search, true) => ("Search", TYPING_HINTS),
        (ConversationMode::Chat, _) => ("Chat", CHAT_HINTS),
    };

    let right = match app.page.turns().len() {
        0 => String::new(),
        1 => "1 message".to_string(),
        n => format!("{n} messages"),
    };
    StatusBar::new(mode, hints).right(&right).render(area, buf);
}

/// Quit confirmation overlay on top of the hero.
pub struct QuitConfirmScreen;

impl Screen for QuitConfirmScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        HeroScreen.render(app, area, buf);
        render_quit_confirm_overlay(area, buf);
    }
}

fn render_quit_confirm_overlay(area: Rect, buf: &mut Buffer) {
    let width = 40.min(area.width.saturating_sub(4));
    let height = 7.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Quit ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let inner = block.inner(overlay_area);
    block.render(overlay_area, buf);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Leave guidely?", Styles::default())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", Styles::default()),
            Span::styled("[y]", Styles::key_hint()),
            Span::styled(" Quit   ", Styles::default()),
            Span::styled("[n]", Styles::key_hint()),
            Span::styled(" Stay", Styles::default()),
        ]),
    ];

    Paragraph::new(lines)
        .style(Styles::default())
        .render(inner, buf);
}
