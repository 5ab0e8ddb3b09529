//! Session loops — the long-running read loops on each side of a connection.
//!
//! Each loop owns the inbound half of the connection and runs until the line
//! sequence ends. A clean end (peer closed, or closed locally) returns the
//! number of lines handled; a read failure is logged and returned.

use homelink_domain::error::ReadError;

use crate::ports::{ActuatorDriver, LineSource};
use crate::services::command_dispatcher::CommandDispatcher;
use crate::services::notification_relay::NotificationRelay;

/// Controller side: decode inbound command lines and dispatch them.
///
/// Empty lines are skipped. A door pulse holds this loop (and only this
/// loop) for the pulse duration.
///
/// # Errors
///
/// Returns the [`ReadError`] that ended the sequence.
pub async fn run_command_loop<L, D>(
    source: &mut L,
    dispatcher: &CommandDispatcher<D>,
) -> Result<u64, ReadError>
where
    L: LineSource,
    D: ActuatorDriver,
{
    let mut handled = 0;
    loop {
        match source.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                tracing::info!(message = %line, "message received");
                dispatcher.dispatch(&line).await;
                handled += 1;
            }
            Ok(None) => {
                tracing::info!(handled, "command stream closed");
                return Ok(handled);
            }
            Err(err) => {
                tracing::warn!(%err, "cannot read commands from the client");
                return Err(err);
            }
        }
    }
}

/// Client side: relay every inbound line as a notification.
///
/// # Errors
///
/// Returns the [`ReadError`] that ended the sequence.
pub async fn run_notification_loop<L: LineSource>(
    source: &mut L,
    relay: &NotificationRelay,
) -> Result<u64, ReadError> {
    let mut relayed = 0;
    loop {
        match source.next_line().await {
            Ok(Some(line)) => {
                if !relay.on_notification(line) {
                    tracing::warn!("notification sink is gone, dropping notification");
                }
                relayed += 1;
            }
            Ok(None) => {
                tracing::info!(relayed, "notification stream closed");
                return Ok(relayed);
            }
            Err(err) => {
                tracing::warn!(%err, "cannot read from the server");
                return Err(err);
            }
        }
    }
}
