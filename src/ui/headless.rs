use crate::events::{Author, InputEdit};
use crate::safe_text::SafeText;
use crate::surface::PresentationSurface;
use crate::ui::composer::InputBuffer;

/// Surface without a display. Keeps the escaped markup of every message so a
/// host can embed it in a page, and records indicator state.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    visible: bool,
    messages: Vec<(Author, String)>,
    typing: bool,
    typing_shown: usize,
    input: InputBuffer,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Rendered messages as `(author, html-escaped text)`
    pub fn messages(&self) -> &[(Author, String)] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// How many times the typing indicator went from hidden to shown
    pub fn typing_shown_count(&self) -> usize {
        self.typing_shown
    }

    /// Transcript as an HTML fragment, one `div` per message
    pub fn to_html(&self) -> String {
        self.messages
            .iter()
            .map(|(author, markup)| {
                format!(
                    "<div class=\"message {author}-message\"><div class=\"message-content\">{markup}</div></div>"
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PresentationSurface for HeadlessSurface {
    fn set_panel_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn append_message(&mut self, author: Author, text: &SafeText) {
        self.messages.push((author, text.markup()));
    }

    fn show_typing(&mut self) {
        if !self.typing {
            self.typing_shown += 1;
        }
        self.typing = true;
    }

    fn hide_typing(&mut self) {
        self.typing = false;
    }

    fn input_text(&self) -> String {
        self.input.content().to_string()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn edit_input(&mut self, edit: InputEdit) {
        self.input.apply(edit);
    }
}
