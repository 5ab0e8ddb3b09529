//! Application services — the controller and client use-cases.

pub mod command_dispatcher;
pub mod doorbell_trigger;
pub mod notification_relay;
pub mod voice_commander;
