//! Virtual doorbell — a push button that can be pressed from code.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use homelink_app::ports::{Edge, EdgeSource};

/// Input pin the doorbell reports edges on unless told otherwise.
pub const DEFAULT_DOORBELL_PIN: u8 = 2;

fn lock(armed: &Mutex<bool>) -> MutexGuard<'_, bool> {
    armed.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable button handle. Every clone presses the same doorbell.
#[derive(Debug, Clone)]
pub struct VirtualDoorbell {
    pin: u8,
    tx: mpsc::UnboundedSender<Edge>,
    armed: Arc<Mutex<bool>>,
}

impl VirtualDoorbell {
    /// A doorbell on [`DEFAULT_DOORBELL_PIN`] and the edge source it feeds.
    /// The source starts disarmed.
    #[must_use]
    pub fn pair() -> (Self, DoorbellEdges) {
        Self::on_pin(DEFAULT_DOORBELL_PIN)
    }

    #[must_use]
    pub fn on_pin(pin: u8) -> (Self, DoorbellEdges) {
        let (tx, rx) = mpsc::unbounded_channel();
        let armed = Arc::new(Mutex::new(false));
        let button = Self {
            pin,
            tx,
            armed: armed.clone(),
        };
        (button, DoorbellEdges { rx, armed })
    }

    /// Press the button once. Returns whether the edge was delivered; a
    /// press while the source is disarmed or gone is dropped.
    pub fn press(&self) -> bool {
        if !*lock(&self.armed) {
            tracing::debug!(pin = self.pin, "doorbell press ignored while disarmed");
            return false;
        }
        self.tx.send(Edge { pin: self.pin }).is_ok()
    }
}

/// Edge source side of a [`VirtualDoorbell`].
#[derive(Debug)]
pub struct DoorbellEdges {
    rx: mpsc::UnboundedReceiver<Edge>,
    armed: Arc<Mutex<bool>>,
}

impl EdgeSource for DoorbellEdges {
    async fn next_edge(&mut self) -> Option<Edge> {
        self.rx.recv().await
    }

    fn arm(&mut self) {
        // Drop edges queued before the last disarm took effect.
        while self.rx.try_recv().is_ok() {}
        *lock(&self.armed) = true;
    }

    fn disarm(&mut self) {
        *lock(&self.armed) = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_drop_presses_before_arm() {
        let (button, mut edges) = VirtualDoorbell::pair();
        assert!(!button.press());

        edges.arm();
        assert!(button.press());
        assert_eq!(edges.next_edge().await, Some(Edge { pin: 2 }));
    }

    #[tokio::test]
    async fn should_report_configured_pin() {
        let (button, mut edges) = VirtualDoorbell::on_pin(7);
        edges.arm();
        button.press();
        assert_eq!(edges.next_edge().await, Some(Edge { pin: 7 }));
    }

    #[tokio::test]
    async fn should_ignore_presses_while_disarmed() {
        let (button, mut edges) = VirtualDoorbell::pair();
        edges.arm();
        edges.disarm();
        assert!(!button.press());

        edges.arm();
        button.press();
        assert_eq!(edges.next_edge().await, Some(Edge { pin: 2 }));
        assert!(edges.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_discard_pending_edges_on_arm() {
        let (button, mut edges) = VirtualDoorbell::pair();
        edges.arm();
        button.press();
        button.press();

        edges.arm();
        assert!(edges.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_end_when_every_button_is_dropped() {
        let (button, mut edges) = VirtualDoorbell::pair();
        let other = button.clone();
        drop(button);
        drop(other);
        assert_eq!(edges.next_edge().await, None);
    }

    #[tokio::test]
    async fn should_fail_press_once_source_is_gone() {
        let (button, mut edges) = VirtualDoorbell::pair();
        edges.arm();
        drop(edges);
        assert!(!button.press());
    }
}
