//! Concrete presentation surfaces

pub mod composer;
pub mod headless;
pub mod panel;
pub mod terminal;

pub use composer::InputBuffer;
pub use headless::HeadlessSurface;
pub use panel::PanelView;
pub use terminal::{TerminalEvents, TerminalSurface};
