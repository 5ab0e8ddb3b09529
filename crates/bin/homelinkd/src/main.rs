//! # homelinkd
//!
//! Controller daemon entry point. See the library docs for the wiring.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use homelink_adapter_tcp::ConnectionManager;
use homelink_adapter_virtual::{VirtualDoorbell, VirtualGpio};
use homelink_app::services::command_dispatcher::CommandDispatcher;
use homelink_domain::dispatch::DispatchTable;
use homelink_domain::error::HomeLinkError;
use homelinkd::config::Config;
use homelinkd::console::{self, ConsoleCommand};
use homelinkd::session::{self, DoorbellSettings};

enum Outcome {
    Ended(Result<u64, HomeLinkError>),
    Exit,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let bind_addr = resolve(&config.bind_addr()).await?;

    // Adapters
    let gpio = Arc::new(VirtualGpio::new());

    // Services
    let dispatcher = CommandDispatcher::new(gpio, DispatchTable::from_layout(&config.layout()));
    let doorbell = DoorbellSettings {
        cooldown: config.cooldown(),
        message: config.doorbell.message.clone(),
    };

    let mut console = console::spawn_reader();
    let manager = ConnectionManager::new();

    loop {
        let (button, edges) = VirtualDoorbell::pair();
        let session = async {
            let connection = manager.accept(bind_addr).await?;
            Ok::<u64, HomeLinkError>(session::serve(connection, &dispatcher, edges, &doorbell).await?)
        };
        tokio::pin!(session);

        let outcome = loop {
            tokio::select! {
                result = &mut session => break Outcome::Ended(result),
                Some(command) = console.recv() => match command {
                    ConsoleCommand::Ring => {
                        if !button.press() {
                            tracing::info!("doorbell is not armed");
                        }
                    }
                    ConsoleCommand::Exit => {
                        tracing::info!("exit requested from console");
                        break Outcome::Exit;
                    }
                },
                Ok(()) = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted");
                    break Outcome::Exit;
                }
            }
        };

        match outcome {
            Outcome::Exit => break,
            Outcome::Ended(Ok(handled)) => tracing::info!(handled, "client disconnected"),
            Outcome::Ended(Err(HomeLinkError::Bind(err))) => {
                tracing::error!(addr = %bind_addr, %err, "cannot accept connections");
                return Err(err.into());
            }
            Outcome::Ended(Err(err)) => tracing::warn!(%err, "session failed"),
        }

        if !config.server.reaccept {
            break;
        }
    }

    tracing::info!("homelinkd stopped");
    Ok(())
}

async fn resolve(bind_addr: &str) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    tokio::net::lookup_host(bind_addr)
        .await?
        .next()
        .ok_or_else(|| format!("bind address {bind_addr} did not resolve").into())
}
