use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::backend::{ChatBackend, ChatRequest, HttpChatBackend};
use crate::config::Config;
use crate::events::{Author, Message, PanelState, Reply, UiEvent};
use crate::mock::{RandomReplies, ReplyStrategy};
use crate::safe_text::SafeText;
use crate::session::Session;
use crate::storage::{FileStore, SessionStore, StorageError};
use crate::surface::{PresentationSurface, UiEventSource};

/// Viewports at or below this width (logical pixels) start with the panel open
pub const MOBILE_BREAKPOINT: u32 = 1024;

pub const GREETING: &str = "Hello! How can I help you?";

/// Bot text when the backend answered without a reply
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong";

/// Bot text when the request itself failed
pub const NETWORK_APOLOGY: &str = "Sorry, the message could not be sent. Please try again later.";

pub type ReplyReceiver = mpsc::UnboundedReceiver<Reply>;

/// Collaborators injected into the controller
pub struct ControllerParts<S> {
    pub surface: S,
    pub store: Box<dyn SessionStore>,
    pub backend: Arc<dyn ChatBackend>,
    pub strategy: Arc<dyn ReplyStrategy>,
}

impl<S> ControllerParts<S> {
    /// File-backed store, HTTP backend and random mock replies, all taken from config
    pub fn from_config(config: &Config, surface: S) -> Self {
        Self {
            surface,
            store: Box::new(FileStore::new(config.storage_dir())),
            backend: Arc::new(HttpChatBackend::new(&config.api_url)),
            strategy: Arc::new(RandomReplies),
        }
    }
}

/// Mediates between user input, the stored session and the chat endpoint,
/// and keeps the panel state.
pub struct ConversationController<S: PresentationSurface> {
    mock_mode: bool,
    surface: S,
    store: Box<dyn SessionStore>,
    backend: Arc<dyn ChatBackend>,
    strategy: Arc<dyn ReplyStrategy>,
    session: Session,
    panel: PanelState,
    transcript: Vec<Message>,
    in_flight: usize,
    replies: mpsc::UnboundedSender<Reply>,
}

impl<S: PresentationSurface> ConversationController<S> {
    /// Build a controller and the receiver its spawned sends report back on
    pub fn new(config: &Config, parts: ControllerParts<S>) -> (Self, ReplyReceiver) {
        let (replies, rx) = mpsc::unbounded_channel();
        let controller = Self {
            mock_mode: config.mock_mode,
            surface: parts.surface,
            store: parts.store,
            backend: parts.backend,
            strategy: parts.strategy,
            session: Session::default(),
            panel: PanelState::default(),
            transcript: Vec::new(),
            in_flight: 0,
            replies,
        };
        (controller, rx)
    }

    /// Restore the stored session, post the greeting and apply the startup
    /// viewport rule.
    pub fn initialize(&mut self, viewport_width: u32) {
        self.session = Session::load(self.store.as_ref());
        self.push_message(Author::Bot, GREETING.to_string());

        if viewport_width <= MOBILE_BREAKPOINT {
            self.panel.is_open = true;
        }
        self.surface.set_panel_visible(self.panel.is_open);

        tracing::info!(
            mock_mode = self.mock_mode,
            has_session = self.session.id().is_some(),
            viewport_width,
            open = self.panel.is_open,
            "chat widget initialized"
        );
    }

    pub fn toggle_panel(&mut self) {
        self.panel.is_open = !self.panel.is_open;
        self.surface.set_panel_visible(self.panel.is_open);
    }

    /// Start one exchange. Returns `false` for blank input, which changes nothing.
    ///
    /// The user message, the cleared input and the typing indicator happen
    /// before this returns; the bot reply arrives later through
    /// [`Self::apply_reply`].
    ///
    /// # Panics
    ///
    /// Spawns the exchange with `tokio::spawn`, so it panics when called
    /// outside a Tokio runtime.
    pub fn send_message(&mut self, raw_text: &str) -> bool {
        let text = raw_text.trim();
        if text.is_empty() {
            return false;
        }
        let text = text.to_string();

        self.push_message(Author::User, text.clone());
        self.surface.clear_input();
        if self.in_flight == 0 {
            self.surface.show_typing();
        }
        self.in_flight += 1;

        let replies = self.replies.clone();
        if self.mock_mode {
            let strategy = Arc::clone(&self.strategy);
            tokio::spawn(async move {
                tokio::time::sleep(strategy.choose_delay()).await;
                let _ = replies.send(Reply::Canned(strategy.choose_response()));
            });
        } else {
            let backend = Arc::clone(&self.backend);
            let request = ChatRequest {
                message: text,
                session_id: self.session.id().map(str::to_string),
            };
            tokio::spawn(async move {
                let outcome = backend.send(&request).await;
                // A closed channel means the widget is gone; the reply is dropped.
                let _ = replies.send(Reply::Live(outcome));
            });
        }
        true
    }

    /// Finish one exchange: exactly one bot message per reply
    pub fn apply_reply(&mut self, reply: Reply) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.surface.hide_typing();
        }

        let text = match reply {
            Reply::Canned(text) => text,
            Reply::Live(Ok(response)) => {
                if let Some(id) = response.session_token() {
                    if let Err(e) = self.session.adopt(id, self.store.as_mut()) {
                        tracing::warn!(error = %e, "session id kept in memory only");
                    }
                }
                response.reply_text().unwrap_or(FALLBACK_REPLY).to_string()
            }
            Reply::Live(Err(e)) => {
                tracing::error!(error = %e, "chat request failed");
                NETWORK_APOLOGY.to_string()
            }
        };
        self.push_message(Author::Bot, text);
    }

    /// React to one UI event. `Break` means the host asked to quit.
    pub fn handle_event(&mut self, event: UiEvent) -> ControlFlow<()> {
        match event {
            UiEvent::LauncherClicked => self.toggle_panel(),
            UiEvent::CloseClicked => {
                if self.panel.is_open {
                    self.toggle_panel();
                }
            }
            UiEvent::Submit => {
                if self.panel.is_open {
                    let raw = self.surface.input_text();
                    self.send_message(&raw);
                }
            }
            UiEvent::Edit(edit) => {
                if self.panel.is_open {
                    self.surface.edit_input(edit);
                }
            }
            UiEvent::Redraw => {}
            UiEvent::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Drive the widget until the host quits or the event source ends
    pub async fn run<E>(&mut self, events: &mut E, replies: &mut ReplyReceiver) -> io::Result<()>
    where
        E: UiEventSource + ?Sized,
    {
        self.surface.refresh()?;
        loop {
            tokio::select! {
                event = events.next_event() => {
                    let Some(event) = event else { break };
                    if self.handle_event(event).is_break() {
                        break;
                    }
                }
                Some(reply) = replies.recv() => self.apply_reply(reply),
            }
            self.surface.refresh()?;
        }

        if self.in_flight > 0 {
            tracing::debug!(in_flight = self.in_flight, "dropping unanswered sends");
        }
        Ok(())
    }

    /// Forget the session token, in memory and in storage
    pub fn clear_session(&mut self) -> Result<(), StorageError> {
        self.session.clear(self.store.as_mut())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.id()
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_open
    }

    pub fn is_mock(&self) -> bool {
        self.mock_mode
    }

    /// Sends still waiting for their reply
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn push_message(&mut self, author: Author, text: String) {
        self.surface.append_message(author, &SafeText::new(text.as_str()));
        self.transcript.push(Message::new(author, text));
    }
}

/// Whether the widget should attach on a page with this path
pub fn should_activate(page_path: &str) -> bool {
    !page_path.contains("/admin")
}
