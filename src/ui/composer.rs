//! Input field state for the panel

use crate::events::InputEdit;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Single-line input buffer with a character-indexed cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn apply(&mut self, edit: InputEdit) {
        self.cursor = self.cursor.min(self.char_len());
        match edit {
            InputEdit::Insert(c) => {
                // Single-line field, like an <input type="text">.
                if c == '\n' || c == '\r' {
                    return;
                }
                let at = self.byte_index(self.cursor);
                self.content.insert(at, c);
                self.cursor += 1;
            }
            InputEdit::Backspace => {
                if self.cursor == 0 {
                    return;
                }
                let end = self.byte_index(self.cursor);
                let start = self.byte_index(self.cursor - 1);
                self.content.replace_range(start..end, "");
                self.cursor -= 1;
            }
            InputEdit::Delete => {
                if self.cursor >= self.char_len() {
                    return;
                }
                let start = self.byte_index(self.cursor);
                let end = self.byte_index(self.cursor + 1);
                self.content.replace_range(start..end, "");
            }
            InputEdit::Left => self.cursor = self.cursor.saturating_sub(1),
            InputEdit::Right => {
                if self.cursor < self.char_len() {
                    self.cursor += 1;
                }
            }
            InputEdit::Home => self.cursor = 0,
            InputEdit::End => self.cursor = self.char_len(),
        }
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.content.len())
    }
}

/// Renders the input row at the bottom of the panel
pub struct Composer<'a> {
    pub input: &'a InputBuffer,
    pub placeholder: &'a str,
}

impl Widget for Composer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Enter to send ")
            .style(Style::default().fg(Color::Green));

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.input.content().is_empty() {
            Line::from(vec![Span::styled(
                self.placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            )])
        } else {
            let mut content: String = self
                .input
                .content()
                .chars()
                .filter(|c| !c.is_control())
                .collect();
            let at = content
                .char_indices()
                .nth(self.input.cursor())
                .map(|(idx, _)| idx)
                .unwrap_or(content.len());
            content.insert(at, '▌');
            Line::from(vec![Span::raw(content)])
        };
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}
