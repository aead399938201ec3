//! Theme and styling definitions for the guidely TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(250, 248, 250);
    pub const FG: Color = Color::Rgb(20, 20, 28);
    pub const DIM: Color = Color::Rgb(120, 116, 130);

    // Accent (the landing page's pink)
    pub const ACCENT: Color = Color::Rgb(235, 200, 235);
    pub const ACCENT_STRONG: Color = Color::Rgb(150, 80, 150);

    // Status bar colors
    pub const STATUS_BG: Color = Color::Rgb(232, 226, 236);
    pub const STATUS_KEY_BG: Color = Color::Rgb(222, 184, 222);

    // Bubbles
    pub const BOT_BUBBLE: Color = Color::Rgb(255, 255, 255);

    // Border colors
    pub const BORDER: Color = Color::Rgb(210, 205, 215);
    pub const BORDER_ACTIVE: Color = Color::Rgb(150, 80, 150);
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text, used for placeholders and hints.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Active/focused element.
    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT_STRONG).bg(Palette::BG)
    }

    /// Headline.
    pub fn headline() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// The switching headline word.
    pub fn headline_word() -> Style {
        Style::default()
            .fg(Palette::ACCENT_STRONG)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT_STRONG)
            .add_modifier(Modifier::BOLD)
    }

    /// User message bubble.
    pub fn user_bubble() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::ACCENT)
    }

    /// Bot message bubble.
    pub fn bot_bubble() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BOT_BUBBLE)
    }

    /// Key hint style (for status bar).
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}
