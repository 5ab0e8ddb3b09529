//! # homelink — homelink client shell
//!
//! Composition root for the client side.
//!
//! ## Responsibilities
//! - Parse configuration (CLI host argument, env vars, config file)
//! - Connect to the controller
//! - Relay inbound notifications to the speaker on a separate task
//! - Read utterances from stdin, one per line, and send the commands they name
//!
//! ## Dependency rule
//! This is the wiring layer — no domain logic belongs here.

mod config;
mod speaker;

use std::io::BufRead;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use homelink_adapter_tcp::ConnectionManager;
use homelink_app::services::notification_relay::NotificationRelay;
use homelink_app::services::voice_commander::VoiceCommander;
use homelink_app::session::run_notification_loop;
use homelink_domain::error::ConnectError;

use crate::config::Config;
use crate::speaker::Speaker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(std::env::args().nth(1))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let manager = ConnectionManager::new();
    let connection = match manager
        .connect(&config.server.host, config.server.port)
        .await
    {
        Ok(connection) => connection,
        Err(ConnectError::UnknownHost { host }) => {
            tracing::error!(host, "unknown host");
            return Err(ConnectError::UnknownHost { host }.into());
        }
        Err(err) => {
            tracing::error!(%err, "cannot connect to the controller");
            return Err(err.into());
        }
    };
    let (mut reader, writer, handle) = connection.into_parts();

    // Inbound: socket → relay → speaker
    let (relay, relay_task) = NotificationRelay::start(Speaker::stdout());
    let mut read_task =
        tokio::spawn(async move { run_notification_loop(&mut reader, &relay).await });

    // Outbound: stdin → translator → socket
    let commander = VoiceCommander::new(writer, config.voice.policy);
    let mut utterances = spawn_utterance_reader();

    loop {
        tokio::select! {
            utterance = utterances.recv() => {
                let Some(utterance) = utterance else { break };
                if let Err(err) = commander.handle_utterance(&utterance).await {
                    tracing::warn!(%err, "cannot send command");
                    break;
                }
            }
            _ = &mut read_task => {
                tracing::info!("controller closed the connection");
                break;
            }
            Ok(()) = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    handle.close().await;
    if !read_task.is_finished() {
        let _ = read_task.await;
    }
    let _ = relay_task.await;
    Ok(())
}

/// Read stdin on a dedicated thread, one utterance per non-empty line.
fn spawn_utterance_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if tx.send(line.to_string()).is_err() {
                break;
            }
        }
    });
    rx
}
