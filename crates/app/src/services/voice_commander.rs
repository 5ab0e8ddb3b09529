//! Voice commander — sends the commands found in a spoken utterance.

use homelink_domain::command::Command;
use homelink_domain::error::WriteError;
use homelink_domain::translator::{MatchPolicy, translate_with};

use crate::ports::LineSender;

/// Client-side use-case: utterance in, canonical tokens out on the wire.
pub struct VoiceCommander<S> {
    sender: S,
    policy: MatchPolicy,
}

impl<S: LineSender> VoiceCommander<S> {
    pub fn new(sender: S, policy: MatchPolicy) -> Self {
        Self { sender, policy }
    }

    /// Translate `utterance` and send each resulting command token.
    ///
    /// Returns the commands that were sent, in send order. An utterance with
    /// no recognizable command sends nothing.
    ///
    /// # Errors
    ///
    /// Returns the first [`WriteError`]; commands after it are not sent.
    pub async fn handle_utterance(&self, utterance: &str) -> Result<Vec<Command>, WriteError> {
        let commands = translate_with(utterance, self.policy);
        if commands.is_empty() {
            tracing::debug!(utterance, "no command recognized");
        }
        for command in &commands {
            self.sender.send_line(command.wire_token()).await?;
            tracing::info!(%command, "command sent");
        }
        Ok(commands)
    }
}
