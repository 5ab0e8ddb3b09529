//! Debounce bookkeeping for a chattering hardware input.

use std::time::{Duration, Instant};

/// Default minimum spacing between two accepted firings.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Remembers when a trigger last fired and rejects edges inside the
/// cool-down window that follows.
#[derive(Debug, Clone)]
pub struct DebounceState {
    last_fired_at: Option<Instant>,
    cooldown: Duration,
}

impl Default for DebounceState {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl DebounceState {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_fired_at: None,
            cooldown,
        }
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    #[must_use]
    pub fn last_fired_at(&self) -> Option<Instant> {
        self.last_fired_at
    }

    /// Register an edge observed at `now`.
    ///
    /// Returns `true` (and records `now`) when the edge falls outside the
    /// window; an edge strictly less than `cooldown` after the last firing
    /// is rejected and leaves the state untouched.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_fired_at {
            if now.saturating_duration_since(last) < self.cooldown {
                return false;
            }
        }
        self.last_fired_at = Some(now);
        true
    }
}
