//! Command dispatcher — turns inbound command tokens into actuator actions.

use homelink_domain::command::Command;
use homelink_domain::dispatch::{ActuatorAction, DispatchTable, PinLevel};
use homelink_domain::error::ActuatorError;

use crate::ports::ActuatorDriver;

/// Maps command tokens to actuator calls through a fixed [`DispatchTable`].
///
/// The dispatcher is the only owner of the actuator driver. Each call runs on
/// the caller's task; door pulses hold that task for the pulse duration and
/// nothing else.
pub struct CommandDispatcher<D> {
    driver: D,
    table: DispatchTable,
}

impl<D: ActuatorDriver> CommandDispatcher<D> {
    /// Create a dispatcher that drives `driver` according to `table`.
    pub fn new(driver: D, table: DispatchTable) -> Self {
        Self { driver, table }
    }

    /// Dispatch every command named by `token`.
    ///
    /// Matching is case-insensitive and non-exclusive: each canonical token
    /// is checked independently, and every hit runs its action in
    /// [`Command::ALL`] order. Unknown tokens are ignored. An actuator
    /// failure is logged and does not stop the remaining commands.
    ///
    /// Returns the commands that were matched.
    pub async fn dispatch(&self, token: &str) -> Vec<Command> {
        let matched = Command::matching(token);
        if matched.is_empty() {
            tracing::debug!(token, "ignoring unknown command");
            return matched;
        }

        for command in &matched {
            if let Err(err) = self.execute(*command).await {
                tracing::warn!(%command, %err, "actuator call failed");
            }
        }
        matched
    }

    /// Run the action bound to a single command.
    ///
    /// # Errors
    ///
    /// Returns the driver's [`ActuatorError`]. When a pulse was engaged, the
    /// release to neutral is still attempted before the error is returned.
    /// Dropping the future during the hold also releases the channel.
    pub async fn execute(&self, command: Command) -> Result<(), ActuatorError> {
        let Some(action) = self.table.action(command) else {
            tracing::debug!(%command, "no action bound");
            return Ok(());
        };

        match action {
            ActuatorAction::SetLevel { pin, level } => {
                self.driver.set_level(pin, level)?;
                match level {
                    PinLevel::High => tracing::info!(pin, "light turned on"),
                    PinLevel::Low => tracing::info!(pin, "light turned off"),
                }
            }
            ActuatorAction::Pulse {
                channel,
                duty,
                hold,
                neutral,
            } => {
                self.driver.set_pulse(channel, duty)?;
                let engaged = PulseRelease {
                    driver: &self.driver,
                    channel,
                    neutral,
                    armed: true,
                };
                tracing::info!(%command, channel, duty, hold_ms = hold.as_millis(), "door pulse engaged");
                tokio::time::sleep(hold).await;
                engaged.release()?;
                tracing::debug!(channel, neutral, "door pulse released");
            }
        }
        Ok(())
    }
}

/// Returns an engaged PWM channel to neutral, even when the hold is cut
/// short because the dispatch future was dropped.
struct PulseRelease<'a, D: ActuatorDriver> {
    driver: &'a D,
    channel: u8,
    neutral: u8,
    armed: bool,
}

impl<D: ActuatorDriver> PulseRelease<'_, D> {
    fn release(mut self) -> Result<(), ActuatorError> {
        self.armed = false;
        self.driver.set_pulse(self.channel, self.neutral)
    }
}

impl<D: ActuatorDriver> Drop for PulseRelease<'_, D> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!(channel = self.channel, "door pulse interrupted, releasing");
        if let Err(err) = self.driver.set_pulse(self.channel, self.neutral) {
            tracing::warn!(channel = self.channel, %err, "cannot release door pulse");
        }
    }
}
