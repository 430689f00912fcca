use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::backend::{BackendError, ChatResponse};

/// Events produced by the presentation layer for the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The collapsed launcher button was activated
    LauncherClicked,

    /// The close control in the panel header was activated
    CloseClicked,

    /// Send button or Enter in the input field
    Submit,

    /// An edit to the input field
    Edit(InputEdit),

    /// Repaint request (resize, animation tick)
    Redraw,

    /// The host is shutting the widget down
    Quit,
}

/// Input field edits, independent of any concrete key source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Who wrote a transcript entry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Author {
    User,
    Bot,
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub author: Author,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Message {
    pub fn new(author: Author, text: impl Into<String>) -> Self {
        Self {
            author,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Panel visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    pub is_open: bool,
}

/// Completion of one send, posted back to the controller by the task that ran it
#[derive(Debug)]
pub enum Reply {
    /// Mock mode picked a canned acknowledgement
    Canned(String),

    /// Live mode finished a round trip to the backend
    Live(Result<ChatResponse, BackendError>),
}
