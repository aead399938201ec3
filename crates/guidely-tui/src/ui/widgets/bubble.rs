//! Chat bubble layout.

use crate::ui::theme::Styles;
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// Which side of the transcript a bubble hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Wrap `text` into bubble lines for a transcript `width` cells wide.
///
/// Bubbles take at most three quarters of the width. Every line of a bubble
/// is padded to the bubble's width so the background reads as one block.
pub fn bubble_lines(text: &str, width: usize, align: Align, style: Style) -> Vec<Line<'static>> {
    let max_inner = (width * 3 / 4).saturating_sub(2).max(1);
    let wrapped: Vec<String> = textwrap::wrap(text, max_inner)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect();
    let inner = wrapped.iter().map(|l| l.width()).max().unwrap_or(0);

    wrapped
        .into_iter()
        .map(|line| {
            let fill = inner - line.width();
            let body = format!(" {line}{} ", " ".repeat(fill));
            let margin = width.saturating_sub(body.width());
            match align {
                Align::Left => Line::from(vec![
                    Span::styled(body, style),
                    Span::styled(" ".repeat(margin), Styles::default()),
                ]),
                Align::Right => Line::from(vec![
                    Span::styled(" ".repeat(margin), Styles::default()),
                    Span::styled(body, style),
                ]),
            }
        })
        .collect()
}
