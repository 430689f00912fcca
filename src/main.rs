use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;

use chat_widget::config::Config;
use chat_widget::{app, logging, should_activate};

#[derive(Parser)]
#[command(name = "chat-widget")]
#[command(version)]
#[command(about = "Customer chat widget for the terminal", long_about = None)]
struct Cli {
    /// Base URL of the chat backend
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Talk to the backend instead of the mock responder
    #[arg(long, global = true, conflicts_with = "mock")]
    live: bool,

    /// Force mock mode regardless of config
    #[arg(long, global = true)]
    mock: bool,

    /// Path of the hosting page; admin pages do not get the widget
    #[arg(long, global = true, default_value = "/")]
    page_path: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the exchange
    Send {
        message: String,
        /// Print the transcript as escaped HTML
        #[arg(long)]
        html: bool,
    },
    /// Show the stored session id
    Session {
        /// Forget the stored session id
        #[arg(long)]
        clear: bool,
    },
    /// Print the effective configuration
    Config {
        /// Write it to ~/.chat-widget/config.toml
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if cli.live {
        config.mock_mode = false;
    }
    if cli.mock {
        config.mock_mode = true;
    }

    match cli.command {
        None => {
            logging::init_file(&config.log_path())?;
            if !should_activate(&cli.page_path) {
                tracing::info!(page_path = %cli.page_path, "admin page, widget not attached");
                return Ok(());
            }
            app::run_terminal(&config).await
        }
        Some(Commands::Send { message, html }) => {
            logging::init_stderr()?;
            if !should_activate(&cli.page_path) {
                tracing::info!(page_path = %cli.page_path, "admin page, widget not attached");
                return Ok(());
            }
            app::send_once(&config, &message, html, &mut io::stdout()).await
        }
        Some(Commands::Session { clear }) => {
            logging::init_stderr()?;
            app::session_command(&config, clear, &mut io::stdout())
        }
        Some(Commands::Config { save }) => {
            let rendered = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("{}", rendered);
            if save {
                config.save()?;
                println!("Saved to {}", config.home.join("config.toml").display());
            }
            Ok(())
        }
    }
}
