//! Event notifications pushed from the controller to the client.

use chrono::{DateTime, Utc};

/// UTC timestamp attached to notifications.
pub type Timestamp = DateTime<Utc>;

/// Text the doorbell trigger sends when it fires.
pub const DOORBELL_MESSAGE: &str = "Someone comes to home";

/// A single notification: the text payload and when it was emitted.
///
/// Only the text travels on the wire. The receiving side stamps its own
/// copy on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNotification {
    pub text: String,
    pub emitted_at: Timestamp,
}

impl EventNotification {
    /// Build a notification stamped with the current time.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emitted_at: Utc::now(),
        }
    }

    /// The text carried on the wire.
    #[must_use]
    pub fn as_line(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_stamp_with_current_time() {
        let before = Utc::now();
        let notification = EventNotification::new(DOORBELL_MESSAGE);
        let after = Utc::now();
        assert!(notification.emitted_at >= before);
        assert!(notification.emitted_at <= after);
    }

    #[test]
    fn should_carry_text_verbatim() {
        let notification = EventNotification::new("  spaced  text ");
        assert_eq!(notification.as_line(), "  spaced  text ");
    }
}
