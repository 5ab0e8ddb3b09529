//! Command — the closed set of actuator requests a client can issue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An actuator request, identified on the wire by its canonical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    LightOn,
    LightOff,
    DoorOpen,
    DoorClose,
}

impl Command {
    /// Every command, in the order matching rules are evaluated.
    pub const ALL: [Self; 4] = [Self::LightOn, Self::LightOff, Self::DoorOpen, Self::DoorClose];

    /// Canonical wire token (`light_on`, `light_off`, `door_open`, `door_close`).
    #[must_use]
    pub fn wire_token(self) -> &'static str {
        match self {
            Self::LightOn => "light_on",
            Self::LightOff => "light_off",
            Self::DoorOpen => "door_open",
            Self::DoorClose => "door_close",
        }
    }

    /// Whether `token` names this command: case-insensitive, either an exact
    /// match or a token that contains the canonical form.
    #[must_use]
    pub fn matches_token(self, token: &str) -> bool {
        token.to_ascii_lowercase().contains(self.wire_token())
    }

    /// All commands named by `token`, in [`Command::ALL`] order.
    ///
    /// Checks are independent, so a token may name several commands. An
    /// unrecognized token yields an empty list.
    #[must_use]
    pub fn matching(token: &str) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|cmd| cmd.matches_token(token))
            .collect()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_token())
    }
}

/// Returned by [`Command::from_str`] when the token is not a canonical one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command token {0:?}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    /// Strict parse: the whole token must equal a canonical token, ignoring
    /// ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.wire_token().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}
