// Terminal surface rendering and the event loop, driven headlessly.

use chat_widget::config::{Config, UiConfig};
use chat_widget::controller::GREETING;
use chat_widget::events::{Author, InputEdit, UiEvent};
use chat_widget::mock::{CANNED_RESPONSES, FixedReplies};
use chat_widget::storage::MemoryStore;
use chat_widget::surface::PresentationSurface;
use chat_widget::ui::TerminalSurface;
use chat_widget::{ControllerParts, ConversationController, ReplyReceiver};
use chat_widget::backend::HttpChatBackend;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn screen(surface: &TerminalSurface<TestBackend>) -> String {
    let buffer = surface.terminal().backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn widget(
    width: u16,
    height: u16,
) -> (ConversationController<TerminalSurface<TestBackend>>, ReplyReceiver) {
    let config = Config::default();
    let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    let surface = TerminalSurface::new(terminal, &UiConfig::default());
    let parts = ControllerParts {
        surface,
        store: Box::new(MemoryStore::new()),
        backend: Arc::new(HttpChatBackend::new(&config.api_url)),
        strategy: Arc::new(FixedReplies {
            delay: Duration::from_millis(1500),
            index: 3,
        }),
    };
    ConversationController::new(&config, parts)
}

#[tokio::test]
async fn wide_terminal_starts_with_launcher_only() {
    let (mut widget, _replies) = widget(160, 30);
    let width = widget.surface().viewport_width().unwrap();
    assert_eq!(width, 1280);
    widget.initialize(width);
    widget.surface_mut().refresh().unwrap();

    let text = screen(widget.surface());
    assert!(text.contains("Chat ^O"), "launcher missing:\n{text}");
    assert!(!text.contains("AI Assistant"));
    assert!(!text.contains(GREETING));
}

#[tokio::test]
async fn narrow_terminal_opens_panel_with_greeting() {
    let (mut widget, _replies) = widget(100, 30);
    let width = widget.surface().viewport_width().unwrap();
    widget.initialize(width);
    assert!(widget.is_open());
    widget.surface_mut().refresh().unwrap();

    let text = screen(widget.surface());
    assert!(text.contains("AI Assistant"), "title missing:\n{text}");
    assert!(text.contains(GREETING));
    assert!(text.contains("Type a message..."));
}

#[tokio::test]
async fn typing_hint_and_escape_sequences() {
    let (mut widget, _replies) = widget(100, 30);
    widget.initialize(800);
    widget.send_message("hi \u{1b}[2Jthere");
    widget.surface_mut().refresh().unwrap();

    let view = widget.surface().view();
    assert!(view.typing);
    let last = view.bubbles.last().unwrap();
    assert_eq!(last.author, Author::User);
    assert_eq!(last.text, "hi [2Jthere");

    let text = screen(widget.surface());
    assert!(text.contains("typing"), "typing hint missing:\n{text}");
    assert!(!text.contains('\u{1b}'));
}

#[tokio::test(start_paused = true)]
async fn event_loop_drives_a_mock_exchange() {
    let (mut widget, mut replies) = widget(160, 30);
    widget.initialize(1280);

    let (tx, mut events) = mpsc::unbounded_channel();
    tx.send(UiEvent::LauncherClicked).unwrap();
    for c in "order status?".chars() {
        tx.send(UiEvent::Edit(InputEdit::Insert(c))).unwrap();
    }
    tx.send(UiEvent::Submit).unwrap();

    let driver = async {
        widget.run(&mut events, &mut replies).await.unwrap();
        widget
    };
    let quitter = async {
        // Past the mock delay, then ask the loop to stop.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        tx.send(UiEvent::Quit).unwrap();
    };
    let (widget, ()) = tokio::join!(driver, quitter);

    let texts: Vec<_> = widget
        .transcript()
        .iter()
        .map(|m| (m.author, m.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (Author::Bot, GREETING),
            (Author::User, "order status?"),
            (Author::Bot, CANNED_RESPONSES[3]),
        ]
    );
    assert!(widget.is_open());
    assert!(!widget.surface().view().typing);
    assert_eq!(widget.surface().input_text(), "");

    let text = screen(widget.surface());
    assert!(text.contains("order status?"), "user bubble missing:\n{text}");
}
