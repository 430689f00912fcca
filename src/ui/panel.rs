//! Launcher button and message panel drawn with ratatui

use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::config::UiConfig;
use crate::events::Author;
use crate::ui::composer::{Composer, InputBuffer};

const LAUNCHER_WIDTH: u16 = 12;
const LAUNCHER_HEIGHT: u16 = 3;
const PANEL_MAX_WIDTH: u16 = 52;
const PANEL_MAX_HEIGHT: u16 = 26;

/// Below this many columns the panel takes the whole screen
const COMPACT_WIDTH: u16 = 60;

/// A message as shown in the panel; `text` is already display-safe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub author: Author,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Everything the terminal needs to draw the widget
#[derive(Debug, Clone)]
pub struct PanelView {
    pub visible: bool,
    pub typing: bool,
    pub bubbles: Vec<Bubble>,
    pub input: InputBuffer,
    title: String,
    placeholder: String,
}

impl PanelView {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            visible: false,
            typing: false,
            bubbles: Vec::new(),
            input: InputBuffer::new(),
            title: ui.title.clone(),
            placeholder: ui.placeholder.clone(),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();
        if self.visible {
            let panel = panel_area(area);
            frame.render_widget(Clear, panel);
            self.render_panel(panel, frame.buffer_mut());
        } else {
            let launcher = launcher_area(area);
            frame.render_widget(Clear, launcher);
            Launcher.render(launcher, frame.buffer_mut());
        }
    }

    fn render_panel(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        // Close control in the top-right corner of the border.
        let close = "[Esc ×]";
        let close_width = close.chars().count() as u16;
        if area.width > close_width + 2 {
            buf.set_string(
                area.x + area.width - close_width - 1,
                area.y,
                close,
                Style::default().fg(Color::Gray),
            );
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Messages
                Constraint::Length(1), // Typing indicator
                Constraint::Length(3), // Input
            ])
            .split(inner);

        self.render_messages(chunks[0], buf);
        if self.typing {
            TypingIndicator.render(chunks[1], buf);
        }
        Composer {
            input: &self.input,
            placeholder: &self.placeholder,
        }
        .render(chunks[2], buf);
    }

    fn render_messages(&self, area: Rect, buf: &mut Buffer) {
        let mut lines: Vec<Line> = Vec::new();
        for bubble in &self.bubbles {
            lines.append(&mut bubble_lines(bubble, area.width));
            lines.push(Line::from(""));
        }
        lines.pop();

        // Keep the newest messages in view.
        let height = area.height as usize;
        let start = lines.len().saturating_sub(height);
        for (i, line) in lines[start..].iter().enumerate() {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}

struct Launcher;

impl Widget for Launcher {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);
        let label = Line::from(vec![Span::styled(
            " Chat ^O",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )]);
        buf.set_line(inner.x, inner.y, &label, inner.width);
    }
}

struct TypingIndicator;

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dots = match (Utc::now().timestamp_millis() / 300) % 4 {
            0 => ".",
            1 => "..",
            2 => "...",
            _ => "   ",
        };
        let line = Line::from(vec![
            Span::styled("typing", Style::default().fg(Color::DarkGray)),
            Span::styled(dots, Style::default().fg(Color::Yellow)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

fn launcher_area(area: Rect) -> Rect {
    let width = LAUNCHER_WIDTH.min(area.width);
    let height = LAUNCHER_HEIGHT.min(area.height);
    Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - height,
        width,
        height,
    }
}

fn panel_area(area: Rect) -> Rect {
    if area.width < COMPACT_WIDTH {
        return area;
    }
    let width = PANEL_MAX_WIDTH.min(area.width.saturating_sub(2));
    let height = PANEL_MAX_HEIGHT.min(area.height.saturating_sub(1));
    Rect {
        x: area.x + area.width - width - 1,
        y: area.y + area.height - height,
        width,
        height,
    }
}

fn bubble_lines(bubble: &Bubble, width: u16) -> Vec<Line<'static>> {
    let (label, style) = match bubble.author {
        Author::User => ("you", Style::default().fg(Color::Blue)),
        Author::Bot => ("assistant", Style::default().fg(Color::Green)),
    };
    let time = bubble.at.with_timezone(&Local).format("%H:%M").to_string();

    let mut lines = vec![Line::from(vec![Span::styled(
        format!("{} · {}", label, time),
        Style::default().fg(Color::DarkGray),
    )])];
    for text in wrap_text(&bubble.text, width.saturating_sub(2) as usize) {
        lines.push(Line::from(vec![Span::raw("  "), Span::styled(text, style)]));
    }
    lines
}

/// Greedy word wrap by character count; words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_paragraphs() {
        assert_eq!(wrap_text("one\n\ntwo", 10), vec!["one", "", "two"]);
    }

    #[test]
    fn wrap_counts_chars_not_bytes() {
        assert_eq!(wrap_text("привет мир", 6), vec!["привет", "мир"]);
    }

    #[test]
    fn panel_fills_narrow_screens() {
        let area = Rect::new(0, 0, 40, 20);
        assert_eq!(panel_area(area), area);

        let wide = Rect::new(0, 0, 120, 40);
        let panel = panel_area(wide);
        assert_eq!(panel.width, PANEL_MAX_WIDTH);
        assert_eq!(panel.x + panel.width, 119);
        assert_eq!(panel.y + panel.height, 40);
    }

    #[test]
    fn launcher_sits_bottom_right() {
        let launcher = launcher_area(Rect::new(0, 0, 80, 24));
        assert_eq!(launcher, Rect::new(68, 21, 12, 3));
    }
}
