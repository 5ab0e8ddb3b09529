//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world: the actuator driver, the doorbell input, the line transport and the
//! UI/speech collaborator. They are defined here (in `app`) so that services
//! and adapters can both depend on them without circular dependencies.

pub mod actuator;
pub mod edge;
pub mod line;
pub mod notification;

pub use actuator::ActuatorDriver;
pub use edge::{Edge, EdgeSource};
pub use line::{LineSender, LineSource};
pub use notification::NotificationSink;
