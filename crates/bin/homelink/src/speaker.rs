//! Speaker — prints notifications where a text-to-speech engine would talk.

use std::io::Write;

use homelink_app::ports::NotificationSink;
use homelink_domain::notification::EventNotification;

/// Writes each notification as one timestamped line.
pub struct Speaker<W> {
    out: W,
}

impl Speaker<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Speaker<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send + 'static> NotificationSink for Speaker<W> {
    fn deliver(&mut self, notification: EventNotification) {
        tracing::info!(text = %notification.text, "notification received");
        let written = writeln!(
            self.out,
            "[{}] {}",
            notification.emitted_at.format("%H:%M:%S"),
            notification.text
        )
        .and_then(|()| self.out.flush());
        if let Err(err) = written {
            tracing::warn!(%err, "cannot speak notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn should_write_one_line_per_notification() {
        let mut speaker = Speaker::new(Vec::new());
        let emitted_at = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 5).unwrap();

        speaker.deliver(EventNotification {
            text: "Someone comes to home".to_string(),
            emitted_at,
        });
        speaker.deliver(EventNotification {
            text: "Someone comes to home".to_string(),
            emitted_at,
        });

        let printed = String::from_utf8(speaker.out).unwrap();
        assert_eq!(
            printed,
            "[18:30:05] Someone comes to home\n[18:30:05] Someone comes to home\n"
        );
    }
}
