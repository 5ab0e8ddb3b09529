//! Line transport ports — the two halves of the newline-delimited protocol.

use std::future::Future;
use std::sync::Arc;

use homelink_domain::error::{ReadError, WriteError};

/// Outbound half: writes one complete line at a time.
///
/// Implementations serialize concurrent callers so that a line is fully
/// written before the next one starts.
pub trait LineSender: Send + Sync {
    /// Write `text` followed by a line terminator and flush it.
    fn send_line(&self, text: &str) -> impl Future<Output = Result<(), WriteError>> + Send;
}

impl<T: LineSender> LineSender for Arc<T> {
    fn send_line(&self, text: &str) -> impl Future<Output = Result<(), WriteError>> + Send {
        (**self).send_line(text)
    }
}

/// Inbound half: the lazy sequence of received lines.
pub trait LineSource: Send {
    /// Wait for the next line.
    ///
    /// `Ok(None)` ends the sequence (peer closed, or the connection was
    /// closed locally). An error also ends it; callers must not poll again.
    fn next_line(&mut self) -> impl Future<Output = Result<Option<String>, ReadError>> + Send;
}
