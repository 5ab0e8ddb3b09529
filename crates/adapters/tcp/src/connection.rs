//! Connection manager — owns the single TCP connection of the process.
//!
//! The manager hands out at most one live [`Connection`] at a time. A client
//! resolves and dials with [`ConnectionManager::connect`]; a controller binds,
//! accepts exactly one peer and stops listening with
//! [`ConnectionManager::accept`] (or [`ConnectionManager::listen`] when the
//! bound address is needed before the peer arrives). Keep-alive probing is
//! enabled on every socket. Nothing is retried here.
//!
//! An attempt that is abandoned before it settles (its future dropped, or an
//! unaccepted listener dropped) returns the slot to `Disconnected`.
//!
//! Accepted sockets get keep-alive by inheriting it from the listening
//! socket. Linux and the BSDs copy the option on `accept`; other platforms
//! may not.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpSocket, TcpStream, lookup_host};

use homelink_domain::connection::ConnectionState;
use homelink_domain::error::{BindError, ConnectError};

use crate::codec::{LineReader, LineWriter};
use crate::link::{Link, SharedSlot, lock_slot};

/// Reader half of a managed connection.
pub type ConnectionReader = LineReader<OwnedReadHalf>;

/// Writer half of a managed connection, shareable between tasks.
pub type ConnectionWriter = Arc<LineWriter<OwnedWriteHalf>>;

/// Sole owner of the process-wide connection slot.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    slot: SharedSlot,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the slot.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        lock_slot(&self.slot).state
    }

    /// Resolve `host` and connect to `port`.
    ///
    /// # Errors
    ///
    /// - [`ConnectError::AlreadyConnected`] if a connection is live
    /// - [`ConnectError::UnknownHost`] if `host` does not resolve (no socket is created)
    /// - [`ConnectError::Io`] if every resolved address refused or failed
    pub async fn connect(&self, host: &str, port: u16) -> Result<Connection, ConnectError> {
        let attempt = self.begin().ok_or(ConnectError::AlreadyConnected)?;
        tracing::info!(host, port, "connecting");

        let result = match dial(host, port).await {
            Ok(stream) => Connection::establish(stream, &attempt).map_err(ConnectError::Io),
            Err(err) => Err(err),
        };

        match result {
            Ok(connection) => {
                tracing::info!(peer = %connection.peer_addr(), "device is connected");
                Ok(connection)
            }
            Err(err) => {
                attempt.settle(ConnectionState::Failed);
                tracing::warn!(host, port, %err, "connect failed");
                Err(err)
            }
        }
    }

    /// Bind `addr` and wait for exactly one peer.
    ///
    /// # Errors
    ///
    /// - [`BindError::AlreadyConnected`] if a connection is live
    /// - [`BindError::Io`] if binding or accepting fails
    pub async fn accept(&self, addr: SocketAddr) -> Result<Connection, BindError> {
        self.listen(addr).await?.accept().await
    }

    /// Bind `addr` and reserve the slot, without waiting for a peer yet.
    ///
    /// # Errors
    ///
    /// - [`BindError::AlreadyConnected`] if a connection is live
    /// - [`BindError::Io`] if the socket cannot be bound
    pub async fn listen(&self, addr: SocketAddr) -> Result<SingleListener, BindError> {
        let attempt = self.begin().ok_or(BindError::AlreadyConnected)?;

        match bind(addr) {
            Ok(listener) => {
                if let Ok(local) = listener.local_addr() {
                    tracing::info!(addr = %local, "waiting for connect");
                }
                Ok(SingleListener { listener, attempt })
            }
            Err(err) => {
                attempt.settle(ConnectionState::Failed);
                tracing::warn!(%addr, %err, "bind failed");
                Err(BindError::Io(err))
            }
        }
    }

    /// Claim the slot for a new attempt. `None` while a connection is live.
    fn begin(&self) -> Option<Attempt> {
        let mut slot = lock_slot(&self.slot);
        if slot.state.is_live() {
            return None;
        }
        slot.state = ConnectionState::Connecting;
        slot.generation += 1;
        Some(Attempt {
            slot: self.slot.clone(),
            generation: slot.generation,
        })
    }
}

/// One claim on the slot. Dropped while still `Connecting`, it releases the
/// slot back to `Disconnected`.
#[derive(Debug)]
struct Attempt {
    slot: SharedSlot,
    generation: u64,
}

impl Attempt {
    fn settle(&self, state: ConnectionState) {
        let mut slot = lock_slot(&self.slot);
        if slot.generation == self.generation {
            slot.state = state;
        }
    }
}

impl Drop for Attempt {
    fn drop(&mut self) {
        let mut slot = lock_slot(&self.slot);
        if slot.generation == self.generation && slot.state == ConnectionState::Connecting {
            tracing::debug!(generation = self.generation, "connection attempt abandoned");
            slot.state = ConnectionState::Disconnected;
        }
    }
}

async fn dial(host: &str, port: u16) -> Result<TcpStream, ConnectError> {
    let addrs: Vec<SocketAddr> = match lookup_host((host, port)).await {
        Ok(addrs) => addrs.collect(),
        Err(err) => {
            tracing::debug!(host, %err, "address resolution failed");
            Vec::new()
        }
    };
    if addrs.is_empty() {
        return Err(ConnectError::UnknownHost {
            host: host.to_string(),
        });
    }

    let mut last_err = None;
    for addr in addrs {
        let socket = keepalive_socket(addr)?;
        match socket.connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                tracing::debug!(%addr, %err, "address refused");
                last_err = Some(err);
            }
        }
    }
    Err(ConnectError::Io(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no usable address")
    })))
}

/// A fresh socket for `addr`'s family with keep-alive probing enabled.
fn keepalive_socket(addr: SocketAddr) -> io::Result<TcpSocket> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_keepalive(true)?;
    Ok(socket)
}

fn bind(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = keepalive_socket(addr)?;
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(1)
}

/// A bound listener that accepts a single peer, then stops listening.
#[derive(Debug)]
pub struct SingleListener {
    listener: TcpListener,
    attempt: Attempt,
}

impl SingleListener {
    /// The bound address (useful when binding port 0).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the address cannot be read.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Wait for one peer. The listener is closed when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Io`] if accepting fails.
    pub async fn accept(self) -> Result<Connection, BindError> {
        let accepted = self.listener.accept().await;
        let result = accepted.and_then(|(stream, _)| {
            Connection::establish(stream, &self.attempt)
        });

        match result {
            Ok(connection) => {
                tracing::info!(peer = %connection.peer_addr(), "device is connected");
                Ok(connection)
            }
            Err(err) => {
                self.attempt.settle(ConnectionState::Failed);
                tracing::warn!(%err, "accept failed");
                Err(BindError::Io(err))
            }
        }
    }
}

/// An established connection: a line reader, a shared line writer and a
/// handle that closes both.
#[derive(Debug)]
pub struct Connection {
    reader: ConnectionReader,
    writer: ConnectionWriter,
    handle: ConnectionHandle,
    peer: SocketAddr,
}

impl Connection {
    fn establish(stream: TcpStream, attempt: &Attempt) -> io::Result<Self> {
        let peer = stream.peer_addr()?;
        stream.set_nodelay(true)?;
        attempt.settle(ConnectionState::Connected);

        let link = Arc::new(Link::new(attempt.slot.clone(), attempt.generation));
        let (read_half, write_half) = stream.into_split();
        let writer = Arc::new(LineWriter::linked(write_half, link.clone()));
        Ok(Self {
            reader: LineReader::linked(read_half, link.clone()),
            handle: ConnectionHandle {
                link,
                writer: writer.clone(),
            },
            writer,
            peer,
        })
    }

    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// A handle that can close this connection from any task.
    #[must_use]
    pub fn handle(&self) -> ConnectionHandle {
        self.handle.clone()
    }

    /// Split into the reader, the shared writer and the close handle.
    #[must_use]
    pub fn into_parts(self) -> (ConnectionReader, ConnectionWriter, ConnectionHandle) {
        (self.reader, self.writer, self.handle)
    }

    /// Close the connection. See [`ConnectionHandle::close`].
    pub async fn close(&self) {
        self.handle.close().await;
    }
}

/// Cloneable close handle for a [`Connection`].
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    link: Arc<Link>,
    writer: ConnectionWriter,
}

impl ConnectionHandle {
    /// Close the connection.
    ///
    /// Pending and future reads end with `Ok(None)`, the write half is shut
    /// down and released, and the slot moves to `Closed` (unless it already
    /// failed). Closing twice is a no-op.
    pub async fn close(&self) {
        if self.link.is_shut_down() {
            return;
        }
        self.link.shut_down();
        self.writer.shutdown().await;
        tracing::info!("connection closed");
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.link.state()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn loopback() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }

    #[tokio::test]
    async fn should_start_disconnected() {
        assert_eq!(ConnectionManager::new().state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn should_report_unknown_host_without_socket() {
        let manager = ConnectionManager::new();
        let result = manager.connect("no-such-host.invalid", 6000).await;
        assert!(matches!(
            result,
            Err(ConnectError::UnknownHost { ref host }) if host == "no-such-host.invalid"
        ));
        assert_eq!(manager.state(), ConnectionState::Failed);
    }

    #[tokio::test]
    async fn should_report_io_failure_when_nothing_listens() {
        let free_port = {
            let listener = std::net::TcpListener::bind(loopback()).unwrap();
            listener.local_addr().unwrap().port()
        };
        let manager = ConnectionManager::new();
        let result = manager.connect("127.0.0.1", free_port).await;
        assert!(matches!(result, Err(ConnectError::Io(_))));
        assert_eq!(manager.state(), ConnectionState::Failed);
    }

    #[tokio::test]
    async fn should_connect_and_accept_over_loopback() {
        let server = ConnectionManager::new();
        let client = ConnectionManager::new();

        let listener = server.listen(loopback()).await.unwrap();
        assert_eq!(server.state(), ConnectionState::Connecting);
        let port = listener.local_addr().unwrap().port();

        let (accepted, connected) =
            tokio::join!(listener.accept(), client.connect("127.0.0.1", port));
        let accepted = accepted.unwrap();
        let connected = connected.unwrap();

        assert_eq!(server.state(), ConnectionState::Connected);
        assert_eq!(client.state(), ConnectionState::Connected);
        assert_eq!(connected.peer_addr().port(), port);
        assert_eq!(accepted.handle().state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn should_reject_second_connection_while_live() {
        let server = ConnectionManager::new();
        let client = ConnectionManager::new();
        let listener = server.listen(loopback()).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (_accepted, connected) =
            tokio::join!(listener.accept(), client.connect("127.0.0.1", port));
        let _connected = connected.unwrap();

        let again = client.connect("127.0.0.1", port).await;
        assert!(matches!(again, Err(ConnectError::AlreadyConnected)));
        let rebind = server.listen(loopback()).await;
        assert!(matches!(rebind, Err(BindError::AlreadyConnected)));
    }

    #[tokio::test]
    async fn should_release_slot_when_listener_dropped() {
        let server = ConnectionManager::new();
        let listener = server.listen(loopback()).await.unwrap();
        drop(listener);
        assert_eq!(server.state(), ConnectionState::Disconnected);
        assert!(server.listen(loopback()).await.is_ok());
    }

    #[tokio::test]
    async fn should_release_slot_when_connect_is_abandoned() {
        let client = ConnectionManager::new();
        tokio::select! {
            biased;
            _ = client.connect("localhost", 6000) => {}
            () = std::future::ready(()) => {}
        }
        assert_eq!(client.state(), ConnectionState::Disconnected);

        let server = ConnectionManager::new();
        let listener = server.listen(loopback()).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (accepted, connected) =
            tokio::join!(listener.accept(), client.connect("127.0.0.1", port));
        accepted.unwrap();
        connected.unwrap();
        assert_eq!(client.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn should_release_slot_when_connect_times_out() {
        let client = ConnectionManager::new();
        let result =
            tokio::time::timeout(Duration::ZERO, client.connect("localhost", 6000)).await;
        assert!(result.is_err());
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn should_keep_settled_state_after_attempt_ends() {
        let client = ConnectionManager::new();
        let _ = client.connect("no-such-host.invalid", 6000).await;
        assert_eq!(client.state(), ConnectionState::Failed);
    }

    #[tokio::test]
    async fn should_enable_keepalive_on_new_sockets() {
        let socket = keepalive_socket(loopback()).unwrap();
        assert!(socket.keepalive().unwrap());

        let listener = bind(loopback()).unwrap();
        assert!(listener.local_addr().unwrap().port() > 0);
    }

    #[tokio::test]
    async fn should_close_idempotently_and_allow_reconnect() {
        let server = ConnectionManager::new();
        let client = ConnectionManager::new();
        let listener = server.listen(loopback()).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (accepted, connected) =
            tokio::join!(listener.accept(), client.connect("127.0.0.1", port));
        let _accepted = accepted.unwrap();
        let connected = connected.unwrap();

        connected.close().await;
        connected.close().await;
        assert_eq!(client.state(), ConnectionState::Closed);

        let listener = server.listen(loopback()).await;
        assert!(matches!(listener, Err(BindError::AlreadyConnected)));

        let listener = ConnectionManager::new().listen(loopback()).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (accepted, reconnected) =
            tokio::join!(listener.accept(), client.connect("127.0.0.1", port));
        accepted.unwrap();
        reconnected.unwrap();
        assert_eq!(client.state(), ConnectionState::Connected);
    }
}
