//! # homelink-adapter-tcp
//!
//! TCP transport for the homelink protocol: one persistent connection per
//! process, carrying newline-delimited UTF-8 lines in both directions.
//!
//! - [`ConnectionManager`] owns the connection slot. It dials a host
//!   (client role) or binds, accepts a single peer and stops listening
//!   (controller role).
//! - [`LineReader`] and [`LineWriter`] are the inbound and outbound halves.
//!   They implement the [`LineSource`](homelink_app::ports::LineSource) and
//!   [`LineSender`](homelink_app::ports::LineSender) ports.
//!
//! ## Dependency rule
//!
//! Depends on `homelink-app` (port traits) and `homelink-domain` only.

pub mod codec;
pub mod connection;
mod link;

pub use codec::{LineReader, LineWriter, MAX_LINE_LEN};
pub use connection::{
    Connection, ConnectionHandle, ConnectionManager, ConnectionReader, ConnectionWriter,
    SingleListener,
};

/// Port the controller listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 6000;
