//! Single-line text input widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// A one-line input showing either its content or a dimmed placeholder.
///
/// The placeholder is drawn verbatim, so an animated placeholder keeps its
/// own cursor glyph.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    content: &'a str,
    block: Option<Block<'a>>,
    focused: bool,
    placeholder: Option<&'a str>,
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            block: None,
            focused: false,
            placeholder: None,
            prompt: "> ",
        }
    }

    /// Set the block for the text input.
    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set focus state.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }

    /// Keep the tail of `text` that fits in `width` cells.
    fn tail(text: &str, width: usize) -> &str {
        if text.width() <= width {
            return text;
        }
        let mut start = text.len();
        let mut used = 0;
        for (i, ch) in text.char_indices().rev() {
            let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            start = i;
        }
        &text[start..]
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let mut spans = vec![Span::styled(self.prompt, Styles::active())];
        if self.content.is_empty() {
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::dim()));
            }
        } else {
            // Leave room for the prompt and the caret
            let room = usize::from(inner.width).saturating_sub(self.prompt.width() + 1);
            spans.push(Span::styled(Self::tail(self.content, room), Styles::default()));
            if self.focused {
                spans.push(Span::styled("_", Styles::active()));
            }
        }

        Paragraph::new(Line::from(spans))
            .style(Styles::default())
            .render(inner, buf);
    }
}
