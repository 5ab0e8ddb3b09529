//! Operator console — commands typed on the daemon's stdin.

use std::io::BufRead;

use tokio::sync::mpsc;

/// A recognized console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Stop the daemon.
    Exit,
    /// Press the virtual doorbell once.
    Ring,
}

impl ConsoleCommand {
    /// Parse one console line. Anything unrecognized yields `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "!exit" => Some(Self::Exit),
            "!ring" => Some(Self::Ring),
            _ => None,
        }
    }
}

/// Read stdin on a dedicated thread and forward recognized commands.
///
/// The channel closes when stdin reaches end of file.
#[must_use]
pub fn spawn_reader() -> mpsc::UnboundedReceiver<ConsoleCommand> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    tracing::warn!(%err, "cannot read console");
                    break;
                }
            };
            match ConsoleCommand::parse(&line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                None => tracing::debug!(line, "unknown console command"),
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_commands() {
        assert_eq!(ConsoleCommand::parse("!exit"), Some(ConsoleCommand::Exit));
        assert_eq!(ConsoleCommand::parse("  !ring\r"), Some(ConsoleCommand::Ring));
    }

    #[test]
    fn should_ignore_everything_else() {
        assert_eq!(ConsoleCommand::parse("exit"), None);
        assert_eq!(ConsoleCommand::parse("!EXIT"), None);
        assert_eq!(ConsoleCommand::parse(""), None);
    }
}
