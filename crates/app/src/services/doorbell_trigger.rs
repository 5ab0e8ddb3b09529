//! Debounced doorbell trigger — one notification per cool-down window.
//!
//! The trigger is an explicit state machine:
//!
//! ```text
//! Armed ──edge──▶ Firing ──sent/failed──▶ CoolingDown ──elapsed──▶ Armed
//! ```
//!
//! Entering `Firing` disarms the edge source, so contact bounce during the
//! send and the cool-down never reaches the trigger. Re-arming is a plain
//! transition back to `Armed`.

use std::time::Duration;

use tokio::sync::watch;

use homelink_domain::debounce::DebounceState;
use homelink_domain::notification::EventNotification;

use crate::ports::{EdgeSource, LineSender};

/// Observable phase of the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Armed,
    Firing,
    CoolingDown,
}

/// Watches an [`EdgeSource`] and sends one notification line per accepted edge.
pub struct DebouncedTrigger<E, S> {
    source: E,
    sender: S,
    debounce: DebounceState,
    message: String,
    state: watch::Sender<TriggerState>,
}

impl<E: EdgeSource, S: LineSender> DebouncedTrigger<E, S> {
    /// Create an armed trigger.
    pub fn new(mut source: E, sender: S, cooldown: Duration, message: impl Into<String>) -> Self {
        source.arm();
        let (state, _) = watch::channel(TriggerState::Armed);
        Self {
            source,
            sender,
            debounce: DebounceState::new(cooldown),
            message: message.into(),
            state,
        }
    }

    /// Follow state transitions.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<TriggerState> {
        self.state.subscribe()
    }

    /// Run until the edge source closes. Returns how many times the trigger fired.
    pub async fn run(mut self) -> u64 {
        let mut fired = 0;
        while let Some(edge) = self.source.next_edge().await {
            let now = tokio::time::Instant::now().into_std();
            if !self.debounce.try_fire(now) {
                tracing::trace!(pin = edge.pin, "edge suppressed by debounce");
                continue;
            }

            tracing::info!(pin = edge.pin, "doorbell rang");
            self.fire().await;
            fired += 1;
        }
        tracing::debug!(fired, "doorbell edge source closed");
        fired
    }

    async fn fire(&mut self) {
        self.transition(TriggerState::Firing);
        self.source.disarm();

        let notification = EventNotification::new(self.message.as_str());
        if let Err(err) = self.sender.send_line(notification.as_line()).await {
            tracing::warn!(%err, "failed to deliver doorbell notification");
        }

        self.transition(TriggerState::CoolingDown);
        tokio::time::sleep(self.debounce.cooldown()).await;

        self.source.arm();
        self.transition(TriggerState::Armed);
    }

    fn transition(&self, next: TriggerState) {
        self.state.send_replace(next);
    }
}
