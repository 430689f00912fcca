use std::io;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{Terminal, backend::Backend};

use crate::config::UiConfig;
use crate::events::{Author, InputEdit, UiEvent};
use crate::safe_text::SafeText;
use crate::surface::{PresentationSurface, UiEventSource};
use crate::ui::panel::{Bubble, PanelView};

/// Logical pixels assumed per terminal column for the startup viewport rule
pub const CELL_WIDTH_PX: u32 = 8;

const TICK: Duration = Duration::from_millis(300);

/// Presentation surface drawing into a ratatui terminal
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    view: PanelView,
}

impl<B: Backend> TerminalSurface<B> {
    pub fn new(terminal: Terminal<B>, ui: &UiConfig) -> Self {
        Self {
            terminal,
            view: PanelView::new(ui),
        }
    }

    pub fn view(&self) -> &PanelView {
        &self.view
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Terminal width converted to logical pixels
    pub fn viewport_width(&self) -> io::Result<u32> {
        Ok(u32::from(self.terminal.size()?.width) * CELL_WIDTH_PX)
    }
}

impl<B: Backend> PresentationSurface for TerminalSurface<B> {
    fn set_panel_visible(&mut self, visible: bool) {
        self.view.visible = visible;
    }

    fn append_message(&mut self, author: Author, text: &SafeText) {
        self.view.bubbles.push(Bubble {
            author,
            text: text.display(),
            at: chrono::Utc::now(),
        });
    }

    fn show_typing(&mut self) {
        self.view.typing = true;
    }

    fn hide_typing(&mut self) {
        self.view.typing = false;
    }

    fn input_text(&self) -> String {
        self.view.input.content().to_string()
    }

    fn clear_input(&mut self) {
        self.view.input.clear();
    }

    fn edit_input(&mut self, edit: InputEdit) {
        self.view.input.apply(edit);
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.terminal.draw(|frame| self.view.render(frame))?;
        Ok(())
    }
}

/// Translate a crossterm event into a widget event
pub fn map_event(event: Event) -> Option<UiEvent> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Resize(_, _) => Some(UiEvent::Redraw),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('o') => Some(UiEvent::LauncherClicked),
            _ => None,
        };
    }

    let edit = match key.code {
        KeyCode::F(2) => return Some(UiEvent::LauncherClicked),
        KeyCode::Esc => return Some(UiEvent::CloseClicked),
        KeyCode::Enter => return Some(UiEvent::Submit),
        KeyCode::Char(c) => InputEdit::Insert(c),
        KeyCode::Backspace => InputEdit::Backspace,
        KeyCode::Delete => InputEdit::Delete,
        KeyCode::Left => InputEdit::Left,
        KeyCode::Right => InputEdit::Right,
        KeyCode::Home => InputEdit::Home,
        KeyCode::End => InputEdit::End,
        _ => return None,
    };
    Some(UiEvent::Edit(edit))
}

/// Keyboard events from the real terminal, plus a redraw tick for the typing dots
pub struct TerminalEvents {
    stream: EventStream,
    tick: tokio::time::Interval,
}

impl TerminalEvents {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
            tick: tokio::time::interval(TICK),
        }
    }
}

impl Default for TerminalEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl UiEventSource for TerminalEvents {
    async fn next_event(&mut self) -> Option<UiEvent> {
        loop {
            tokio::select! {
                _ = self.tick.tick() => return Some(UiEvent::Redraw),
                event = self.stream.next() => match event {
                    Some(Ok(event)) => {
                        if let Some(ui_event) = map_event(event) {
                            return Some(ui_event);
                        }
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "terminal event stream failed");
                        return None;
                    }
                    None => return None,
                },
            }
        }
    }
}
