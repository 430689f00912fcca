//! Rendering seam between the controller and whatever draws the widget

use std::io;

use async_trait::async_trait;

use crate::events::{Author, InputEdit, UiEvent};
use crate::safe_text::SafeText;

/// Draws the launcher, the panel and the transcript, and owns the input field.
///
/// The controller only ever talks to the display through this trait.
pub trait PresentationSurface {
    fn set_panel_visible(&mut self, visible: bool);

    fn append_message(&mut self, author: Author, text: &SafeText);

    fn show_typing(&mut self);

    fn hide_typing(&mut self);

    /// Current contents of the input field
    fn input_text(&self) -> String;

    fn clear_input(&mut self);

    fn edit_input(&mut self, edit: InputEdit);

    /// Flush pending changes to the display
    fn refresh(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Source of UI events for [`crate::controller::ConversationController::run`]
#[async_trait(?Send)]
pub trait UiEventSource {
    /// `None` once the source is exhausted
    async fn next_event(&mut self) -> Option<UiEvent>;
}

#[async_trait(?Send)]
impl UiEventSource for tokio::sync::mpsc::UnboundedReceiver<UiEvent> {
    async fn next_event(&mut self) -> Option<UiEvent> {
        self.recv().await
    }
}
