//! Notification port — the UI/speech collaborator on the client.

use homelink_domain::notification::EventNotification;

/// Receives every inbound notification, unmodified and in arrival order.
pub trait NotificationSink: Send + 'static {
    fn deliver(&mut self, notification: EventNotification);
}
