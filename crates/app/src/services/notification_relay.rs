//! Notification relay — hands inbound notifications to the UI/speech side.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use homelink_domain::notification::EventNotification;

use crate::ports::NotificationSink;

/// Forwards notification text to a [`NotificationSink`] running on its own task.
///
/// [`on_notification`](Self::on_notification) never waits on the sink, so the
/// read loop that feeds the relay keeps draining the socket. Delivery order
/// matches call order. No filtering or deduplication happens here.
#[derive(Clone)]
pub struct NotificationRelay {
    tx: mpsc::UnboundedSender<EventNotification>,
}

impl NotificationRelay {
    /// Spawn the delivery task for `sink`.
    ///
    /// The task ends once every relay handle has been dropped and the queue
    /// is drained.
    pub fn start<K: NotificationSink>(sink: K) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(deliver_all(rx, sink));
        (Self { tx }, handle)
    }

    /// Queue `text` for delivery, unmodified.
    ///
    /// Returns `false` when the delivery task is gone and the text was dropped.
    pub fn on_notification(&self, text: impl Into<String>) -> bool {
        let notification = EventNotification::new(text);
        tracing::debug!(text = %notification.text, "notification received");
        self.tx.send(notification).is_ok()
    }
}

async fn deliver_all<K: NotificationSink>(
    mut rx: mpsc::UnboundedReceiver<EventNotification>,
    mut sink: K,
) {
    while let Some(notification) = rx.recv().await {
        sink.deliver(notification);
    }
}
