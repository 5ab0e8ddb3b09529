//! # homelink-adapter-virtual
//!
//! Simulated hardware so the controller runs on any machine.
//!
//! | Device | Port | Behaviour |
//! |--------|------|-----------|
//! | [`VirtualGpio`] | `ActuatorDriver` | Records pin levels and PWM duties, rejects duties above 100 |
//! | [`VirtualDoorbell`] | `EdgeSource` | Emits one edge per [`press`](VirtualDoorbell::press) while armed |
//!
//! ## Dependency rule
//!
//! Depends on `homelink-app` (port traits) and `homelink-domain` only.

mod doorbell;
mod gpio;

pub use doorbell::{DEFAULT_DOORBELL_PIN, DoorbellEdges, VirtualDoorbell};
pub use gpio::{GpioEvent, VirtualGpio};
