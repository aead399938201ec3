//! Bottom status line: mode pill, key hints, and an optional counter on the
//! right.

use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// A key and what it does.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: &'a [KeyHint],
    right: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: &'a str, hints: &'a [KeyHint]) -> Self {
        Self {
            mode,
            hints,
            right: None,
        }
    }

    /// Text pinned to the right edge, dropped when it would overlap the hints.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right = Some(text).filter(|t| !t.is_empty());
        self
    }

    fn left_line(&self) -> Line<'a> {
        let pill = Styles::title().bg(Palette::ACCENT);
        let mut spans = vec![Span::styled(format!(" {} ", self.mode), pill)];
        spans.extend(self.hints.iter().flat_map(|hint| {
            [
                Span::styled(" ", Styles::status_bar()),
                Span::styled(format!(" {} ", hint.key), Styles::key_hint()),
                Span::styled(format!(" {}", hint.label), Styles::key_label()),
            ]
        }));
        Line::from(spans)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let row = Rect { height: 1, ..area };

        let left = self.left_line();
        let left_width = left.width();
        Paragraph::new(left)
            .style(Styles::status_bar())
            .render(row, buf);

        let Some(text) = self.right else {
            return;
        };
        // One cell of margin on each side of the counter
        if left_width + text.width() + 2 > usize::from(row.width) {
            return;
        }
        let left_cells = u16::try_from(left_width).unwrap_or(row.width);
        let rest = Rect {
            x: row.x + left_cells,
            width: row.width - left_cells,
            ..row
        };
        Paragraph::new(Line::from(format!("{text} ")))
            .alignment(Alignment::Right)
            .style(Styles::status_bar())
            .render(rest, buf);
    }
}
