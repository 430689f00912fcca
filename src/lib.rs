//! Embeddable customer-chat widget.
//!
//! [`controller::ConversationController`] owns the panel state, the session
//! token and the send/receive cycle. Rendering, storage, the chat backend and
//! the mock responder are injected through traits.

pub mod app;
pub mod backend;
pub mod config;
pub mod controller;
pub mod events;
pub mod logging;
pub mod mock;
pub mod safe_text;
pub mod session;
pub mod storage;
pub mod surface;
pub mod ui;

pub use controller::{ControllerParts, ConversationController, ReplyReceiver, should_activate};
