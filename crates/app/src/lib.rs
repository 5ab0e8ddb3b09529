//! # homelink-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `ActuatorDriver` — digital pin levels and PWM duty cycles
//!   - `EdgeSource` — edge notifications from the doorbell input
//!   - `LineSender` / `LineSource` — the two halves of the line transport
//!   - `NotificationSink` — the UI/speech collaborator on the client
//! - Provide the **use-cases**:
//!   - `CommandDispatcher` — command token → actuator action (controller)
//!   - `DebouncedTrigger` — doorbell edge → one notification per window (controller)
//!   - `VoiceCommander` — utterance → command tokens on the wire (client)
//!   - `NotificationRelay` — inbound notification → UI/speech sink (client)
//! - Run the per-connection read loops (`session`)
//!
//! ## Dependency rule
//! Depends on `homelink-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod session;

#[cfg(test)]
mod fakes;
