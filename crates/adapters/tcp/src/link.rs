//! Shared bookkeeping between the halves of one connection and the manager slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use homelink_domain::connection::ConnectionState;

/// The process-wide connection slot.
///
/// `generation` increases with every attempt so a stale connection cannot
/// overwrite the state of the one that replaced it.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    pub(crate) state: ConnectionState,
    pub(crate) generation: u64,
}

pub(crate) type SharedSlot = Arc<Mutex<Slot>>;

pub(crate) fn lock_slot(slot: &SharedSlot) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ties the reader, writer and handle of one connection together.
#[derive(Debug)]
pub(crate) struct Link {
    slot: SharedSlot,
    generation: u64,
    shutdown: watch::Sender<bool>,
}

impl Link {
    pub(crate) fn new(slot: SharedSlot, generation: u64) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            slot,
            generation,
            shutdown,
        }
    }

    /// A link with a private slot, for codecs built over arbitrary streams.
    pub(crate) fn detached() -> Self {
        let slot = Arc::new(Mutex::new(Slot {
            state: ConnectionState::Connected,
            generation: 0,
        }));
        Self::new(slot, 0)
    }

    pub(crate) fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    pub(crate) fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Move this connection from `Connected` to `state`. Later transitions
    /// are ignored, as are transitions for a superseded generation.
    pub(crate) fn finish(&self, state: ConnectionState) {
        let mut slot = lock_slot(&self.slot);
        if slot.generation == self.generation && slot.state == ConnectionState::Connected {
            tracing::debug!(generation = self.generation, %state, "connection finished");
            slot.state = state;
        }
    }

    /// Wake every pending read with end-of-sequence and mark the slot closed.
    pub(crate) fn shut_down(&self) {
        self.shutdown.send_replace(true);
        self.finish(ConnectionState::Closed);
    }

    pub(crate) fn state(&self) -> ConnectionState {
        let slot = lock_slot(&self.slot);
        if slot.generation == self.generation {
            slot.state
        } else {
            ConnectionState::Closed
        }
    }
}
