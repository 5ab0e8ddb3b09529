//! Error taxonomy shared across the workspace.
//!
//! Each failure class has its own typed enum; [`HomeLinkError`] wraps them
//! all via `#[from]` so callers that do not care about the class can use `?`.

/// Top-level error for homelink operations.
#[derive(Debug, thiserror::Error)]
pub enum HomeLinkError {
    #[error("connect failed")]
    Connect(#[from] ConnectError),

    #[error("bind failed")]
    Bind(#[from] BindError),

    #[error("read failed")]
    Read(#[from] ReadError),

    #[error("write failed")]
    Write(#[from] WriteError),

    #[error("actuator failed")]
    Actuator(#[from] ActuatorError),
}

/// Failure to establish an outbound (client) connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The host name did not resolve to any address.
    #[error("unknown host {host}")]
    UnknownHost { host: String },

    /// A socket operation failed after resolution.
    #[error("socket error while connecting")]
    Io(#[from] std::io::Error),

    /// The process already owns a live connection.
    #[error("a connection is already established")]
    AlreadyConnected,
}

/// Failure to accept an inbound (controller) connection.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// Binding, listening or accepting failed.
    #[error("socket error while accepting")]
    Io(#[from] std::io::Error),

    /// The process already owns a live connection.
    #[error("a connection is already established")]
    AlreadyConnected,
}

/// Failure on the inbound half of a connection.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read line")]
    Io(#[from] std::io::Error),
}

/// Failure on the outbound half of a connection.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to write line")]
    Io(#[from] std::io::Error),

    /// The connection was closed before the write started.
    #[error("connection is closed")]
    Closed,

    /// The payload would have broken line framing.
    #[error("payload contains a line terminator")]
    EmbeddedNewline,
}

/// Failure reported by the actuator driver. Fatal to the call that hit it only.
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("pin {pin} rejected level change")]
    Pin { pin: u8 },

    #[error("channel {channel} rejected duty {duty}")]
    Pwm { channel: u8, duty: u8 },
}
