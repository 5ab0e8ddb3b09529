//! One client session on the controller.

use std::time::Duration;

use homelink_adapter_tcp::Connection;
use homelink_app::ports::{ActuatorDriver, EdgeSource};
use homelink_app::services::command_dispatcher::CommandDispatcher;
use homelink_app::services::doorbell_trigger::DebouncedTrigger;
use homelink_app::session::run_command_loop;
use homelink_domain::error::ReadError;

/// Doorbell behaviour applied to every session.
#[derive(Debug, Clone)]
pub struct DoorbellSettings {
    pub cooldown: Duration,
    pub message: String,
}

/// Serve one accepted client until its command stream ends.
///
/// The doorbell trigger runs on its own task and writes to the same
/// connection as long as the session lasts. When the command loop stops the
/// trigger is aborted and the connection closed.
///
/// # Errors
///
/// Returns the [`ReadError`] that ended the command stream.
pub async fn serve<D, E>(
    connection: Connection,
    dispatcher: &CommandDispatcher<D>,
    edges: E,
    doorbell: &DoorbellSettings,
) -> Result<u64, ReadError>
where
    D: ActuatorDriver,
    E: EdgeSource + 'static,
{
    let peer = connection.peer_addr();
    let (mut reader, writer, handle) = connection.into_parts();

    let trigger = DebouncedTrigger::new(edges, writer, doorbell.cooldown, doorbell.message.as_str());
    let trigger_task = tokio::spawn(trigger.run());

    tracing::info!(%peer, "session started");
    let result = run_command_loop(&mut reader, dispatcher).await;

    trigger_task.abort();
    handle.close().await;
    tracing::info!(%peer, "session ended");
    result
}
