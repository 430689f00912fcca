use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout, Write};

use crate::config::Config;
use crate::controller::{ControllerParts, ConversationController};
use crate::events::Author;
use crate::safe_text::SafeText;
use crate::session::Session;
use crate::storage::FileStore;
use crate::ui::{HeadlessSurface, TerminalEvents, TerminalSurface};

/// Run the widget full-screen until the user quits
pub async fn run_terminal(config: &Config) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let result = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => run_widget(config, terminal).await,
        Err(e) => Err(e).context("Failed to create terminal"),
    };

    // Restore the host terminal before reporting anything.
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    result
}

async fn run_widget(config: &Config, terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let surface = TerminalSurface::new(terminal, &config.ui);
    let viewport_width = surface.viewport_width()?;

    let (mut controller, mut replies) =
        ConversationController::new(config, ControllerParts::from_config(config, surface));
    controller.initialize(viewport_width);

    let mut events = TerminalEvents::new();
    controller.run(&mut events, &mut replies).await?;
    controller.surface_mut().terminal_mut().show_cursor()?;
    Ok(())
}

/// One exchange against the configured backend (or mock), printed to `out`.
///
/// Everything written is passed through [`SafeText::display`], so neither the
/// user nor the backend can drive the terminal with escape sequences.
pub async fn send_once(
    config: &Config,
    message: &str,
    html: bool,
    out: &mut impl Write,
) -> Result<()> {
    let (mut controller, mut replies) = ConversationController::new(
        config,
        ControllerParts::from_config(config, HeadlessSurface::new()),
    );
    controller.initialize(0);
    let greeting_len = controller.transcript().len();

    if !controller.send_message(message) {
        print_line(out, "Nothing to send.")?;
        return Ok(());
    }
    let reply = replies
        .recv()
        .await
        .context("Reply channel closed before an answer arrived")?;
    controller.apply_reply(reply);

    if html {
        print_line(out, &controller.surface().to_html())?;
    } else {
        for entry in &controller.transcript()[greeting_len..] {
            let label = match entry.author {
                Author::User => "you",
                Author::Bot => "bot",
            };
            print_line(out, &format!("{}: {}", label, entry.text))?;
        }
    }
    if let Some(id) = controller.session_id() {
        print_line(out, &format!("session: {}", id))?;
    }
    Ok(())
}

/// Show or clear the stored session token
pub fn session_command(config: &Config, clear: bool, out: &mut impl Write) -> Result<()> {
    let mut store = FileStore::new(config.storage_dir());
    let mut session = Session::load(&store);

    if clear {
        session
            .clear(&mut store)
            .context("Failed to clear stored session")?;
        print_line(out, "Session cleared.")?;
        return Ok(());
    }

    match session.id() {
        Some(id) => print_line(out, id),
        None => print_line(out, "No session yet."),
    }
}

fn print_line(out: &mut impl Write, line: &str) -> Result<()> {
    writeln!(out, "{}", SafeText::new(line).display()).context("Failed to write output")
}
