//! Edge port — a hardware input that reports signal transitions.

use std::future::Future;

/// One physical transition observed on an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub pin: u8,
}

/// Subscription to edges on a single input.
///
/// While disarmed the source drops edges instead of queueing them, and
/// [`arm`](Self::arm) discards anything that was still pending, so a consumer
/// never sees an edge that happened while it was not listening.
pub trait EdgeSource: Send {
    /// Wait for the next edge. Returns `None` once the source is gone.
    fn next_edge(&mut self) -> impl Future<Output = Option<Edge>> + Send;

    /// Start delivering edges.
    fn arm(&mut self);

    /// Stop delivering edges until the next [`arm`](Self::arm).
    fn disarm(&mut self);
}
