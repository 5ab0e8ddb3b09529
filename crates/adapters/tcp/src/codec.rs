//! Newline-delimited UTF-8 line codec.
//!
//! Wire format: the payload bytes followed by `\n`. No length prefix and no
//! escaping, so a payload must not contain `\n` or `\r`. A trailing `\r` is
//! dropped on read so CRLF peers interoperate. Inbound lines longer than
//! [`MAX_LINE_LEN`] bytes are a read error.

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::sync::{Mutex, watch};

use homelink_app::ports::{LineSender, LineSource};
use homelink_domain::connection::ConnectionState;
use homelink_domain::error::{ReadError, WriteError};

use crate::link::Link;

/// Longest accepted inbound line, terminator excluded.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Inbound half: yields one decoded line per call.
pub struct LineReader<R> {
    inner: BufReader<R>,
    link: Arc<Link>,
    shutdown: watch::Receiver<bool>,
    finished: bool,
}

impl<R: AsyncRead + Unpin + Send> LineReader<R> {
    /// Wrap a raw byte stream that is not managed by a
    /// [`ConnectionManager`](crate::ConnectionManager).
    pub fn new(inner: R) -> Self {
        Self::linked(inner, Arc::new(Link::detached()))
    }

    pub(crate) fn linked(inner: R, link: Arc<Link>) -> Self {
        let shutdown = link.shutdown_signal();
        Self {
            inner: BufReader::new(inner),
            link,
            shutdown,
            finished: false,
        }
    }

    /// Wait for the next complete line.
    ///
    /// Returns `Ok(None)` once the peer has closed the stream or the
    /// connection was closed locally; the sequence stays ended after that.
    /// A read error (including invalid UTF-8 or a line longer than
    /// [`MAX_LINE_LEN`]) also ends the sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Io`] on a transport or decoding failure.
    pub async fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        if self.finished || self.link.is_shut_down() {
            self.finished = true;
            return Ok(None);
        }

        let mut buf = Vec::new();
        // One byte of slack for the terminator of a line of exactly MAX_LINE_LEN.
        let mut limited = (&mut self.inner).take(MAX_LINE_LEN as u64 + 1);
        let read = tokio::select! {
            biased;
            () = wait_for_shutdown(&mut self.shutdown) => {
                self.finished = true;
                return Ok(None);
            }
            read = limited.read_until(b'\n', &mut buf) => read,
        };

        match read {
            Ok(0) => {
                self.finished = true;
                self.link.finish(ConnectionState::Closed);
                Ok(None)
            }
            Ok(_) if buf.len() > MAX_LINE_LEN && buf.last() != Some(&b'\n') => {
                let err = io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line exceeds {MAX_LINE_LEN} bytes"),
                );
                Err(self.fail(err))
            }
            Ok(_) => match decode(buf) {
                Ok(line) => Ok(Some(line)),
                Err(err) => Err(self.fail(err)),
            },
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: io::Error) -> ReadError {
        self.finished = true;
        self.link.finish(ConnectionState::Failed);
        ReadError::Io(err)
    }
}

impl<R: AsyncRead + Unpin + Send> LineSource for LineReader<R> {
    fn next_line(
        &mut self,
    ) -> impl Future<Output = Result<Option<String>, ReadError>> + Send {
        LineReader::next_line(self)
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender means the link is gone, which also ends the stream.
    let _ = shutdown.wait_for(|closed| *closed).await;
}

impl<R> std::fmt::Debug for LineReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

fn decode(mut buf: Vec<u8>) -> Result<String, io::Error> {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    String::from_utf8(buf).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Outbound half: writes whole lines, one caller at a time.
pub struct LineWriter<W> {
    inner: Mutex<Option<W>>,
    link: Arc<Link>,
}

impl<W: AsyncWrite + Unpin + Send> LineWriter<W> {
    /// Wrap a raw byte stream that is not managed by a
    /// [`ConnectionManager`](crate::ConnectionManager).
    pub fn new(inner: W) -> Self {
        Self::linked(inner, Arc::new(Link::detached()))
    }

    pub(crate) fn linked(inner: W, link: Arc<Link>) -> Self {
        Self {
            inner: Mutex::new(Some(inner)),
            link,
        }
    }

    /// Write `text` and a line terminator, then flush.
    ///
    /// Concurrent callers are serialized: the whole line is written before
    /// the next caller gets the stream.
    ///
    /// # Errors
    ///
    /// - [`WriteError::EmbeddedNewline`] if `text` contains `\n` or `\r` (nothing is written)
    /// - [`WriteError::Closed`] if the writer was shut down or failed earlier
    /// - [`WriteError::Io`] on a transport failure; the writer is then unusable
    pub async fn send_line(&self, text: &str) -> Result<(), WriteError> {
        if text.contains(['\n', '\r']) {
            return Err(WriteError::EmbeddedNewline);
        }

        let mut guard = self.inner.lock().await;
        let Some(stream) = guard.as_mut() else {
            return Err(WriteError::Closed);
        };

        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');

        let written = match stream.write_all(line.as_bytes()).await {
            Ok(()) => stream.flush().await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            *guard = None;
            self.link.finish(ConnectionState::Failed);
            return Err(WriteError::Io(err));
        }
        Ok(())
    }

    /// Flush and release the stream. Later sends fail with [`WriteError::Closed`].
    pub async fn shutdown(&self) {
        let mut guard = self.inner.lock().await;
        if let Some(mut stream) = guard.take() {
            if let Err(err) = stream.shutdown().await {
                tracing::debug!(%err, "error while shutting down write half");
            }
        }
    }
}

impl<W> std::fmt::Debug for LineWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineWriter").finish_non_exhaustive()
    }
}

impl<W: AsyncWrite + Unpin + Send> LineSender for LineWriter<W> {
    fn send_line(&self, text: &str) -> impl Future<Output = Result<(), WriteError>> + Send {
        LineWriter::send_line(self, text)
    }
}
