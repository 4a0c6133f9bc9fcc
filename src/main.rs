//! Game SDK console - dry-run client for the game server APIs
//!
//! Reads commands from stdin, drives the chat and action APIs, and prints
//! every outbound frame as one JSON line on stdout:
//! - `say <text>` / `chat <channel> <text>`
//! - `move <x> <y> <z>` / `shoot <x> <y> <z> <velocity-json>`
//! - `action <type> [data-json]`
//! - `quit`

mod console;

use std::io::BufRead;
use std::sync::Arc;

use anyhow::Context;
use game_server_sdk::{
    ActionFacade, ChatFacade, ClientConfig, ClientMsg, LogFormat, OutboundConnection,
};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Input lines buffered ahead of the console loop
const STDIN_BUFFER: usize = 16;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = ClientConfig::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    info!(outbox_capacity = config.outbox_capacity, "Starting game SDK console");

    let (connection, outbox) = OutboundConnection::new(config.outbox_capacity);
    let connection = Arc::new(connection);
    let chat = ChatFacade::new(connection.clone());
    let actions = ActionFacade::new(connection);

    // Spawn writer task: outbox -> stdout
    let writer_handle = tokio::spawn(write_frames(outbox));

    let lines = spawn_stdin_reader()?;
    if let Err(e) = console::run(lines, &chat, &actions, shutdown_signal()).await {
        error!(error = %e, "Send failed");
    }

    // Dropping the facades closes the outbox so the writer drains and exits
    drop(chat);
    drop(actions);
    writer_handle
        .await
        .context("Frame writer task panicked")?
        .context("Failed to write frames")?;

    info!("Console shutdown complete");
    Ok(())
}

/// Read stdin lines on a dedicated thread
///
/// A blocking read cannot be cancelled, so it must not live on the runtime:
/// returning from `main` leaves the thread behind instead of waiting on it.
fn spawn_stdin_reader() -> anyhow::Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel(STDIN_BUFFER);

    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        break;
                    }
                }
            }
        })
        .context("Failed to spawn stdin reader")?;

    Ok(rx)
}

/// Encode queued frames and write them to stdout
async fn write_frames(mut outbox: mpsc::Receiver<ClientMsg>) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();

    while let Some(frame) = outbox.recv().await {
        let mut json = serde_json::to_string(&frame)?;
        json.push('\n');
        stdout.write_all(json.as_bytes()).await?;
        stdout.flush().await?;
        debug!(bytes = json.len(), "Frame written");
    }

    debug!("Outbox closed");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str, format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    // Logs go to stderr, stdout carries frames
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
