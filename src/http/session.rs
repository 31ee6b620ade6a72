//! Session operations abstraction
//!
//! A session owns one outbound stream connection for exactly one
//! request/response exchange. `SessionOps` defines the raw transport
//! operations; `HttpSession` layers the deadline handling, the full-buffer
//! send and the read-until-close receive loop on top of it.

use super::{Error, Result};
use bytes::{Bytes, BytesMut};
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

/// Session operations trait
///
/// This trait defines the operations that can be performed on a session,
/// independent of the underlying transport.
pub trait SessionOps {
    /// Poll the session for events
    ///
    /// Returns true if the session is ready for the requested operation
    fn poll(&self, events: PollEvents, timeout: Option<Duration>) -> Result<bool>;

    /// Read data from the session
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write data to the session
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Close the session
    fn close(&mut self) -> Result<()>;
}

/// Poll events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvents {
    Read,
    Write,
}

/// HTTP session wrapping a transport with session operations
pub struct HttpSession<S: SessionOps> {
    session: S,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl<S: SessionOps> HttpSession<S> {
    /// Create a new HTTP session
    pub fn new(session: S) -> Self {
        HttpSession {
            session,
            timeout: Some(Duration::from_secs(10)),
            deadline: None,
        }
    }

    /// Set the deadline applied to each read and write
    ///
    /// `None` waits forever.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Set the point in time after which every read and write fails
    ///
    /// Bounds the whole exchange, so a peer trickling bytes cannot keep the
    /// session alive by always answering within the per-operation timeout.
    pub fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    /// Timeout for the next poll: the per-operation timeout, capped by
    /// whatever is left before the deadline
    fn poll_timeout(&self) -> Result<Option<Duration>> {
        let Some(deadline) = self.deadline else {
            return Ok(self.timeout);
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(Error::Timeout);
        }

        Ok(Some(self.timeout.map_or(remaining, |t| t.min(remaining))))
    }

    /// Read data with timeout
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let timeout = self.poll_timeout()?;
        if !self.session.poll(PollEvents::Read, timeout)? {
            return Err(Error::Timeout);
        }

        self.session.read(buf)
    }

    /// Write data with timeout
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let timeout = self.poll_timeout()?;
        if !self.session.poll(PollEvents::Write, timeout)? {
            return Err(Error::Timeout);
        }

        self.session.write(buf)
    }

    /// Send the whole buffer, retrying partial writes
    pub fn send_all(&mut self, buf: &[u8]) -> Result<()> {
        let mut written = 0;

        while written < buf.len() {
            let n = self.write(&buf[written..])?;
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            written += n;
        }

        tracing::trace!(bytes = written, "request sent");
        Ok(())
    }

    /// Read `chunk_size` bytes at a time until the peer closes the stream
    pub fn receive_all(&mut self, chunk_size: usize) -> Result<Bytes> {
        let chunk_size = chunk_size.max(1);
        let mut buffer = BytesMut::with_capacity(chunk_size);
        let mut chunk = vec![0u8; chunk_size];

        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);
        }

        tracing::trace!(bytes = buffer.len(), "response received");
        Ok(buffer.freeze())
    }

    /// Receive the full response and decode it as UTF-8 text
    pub fn receive_text(&mut self, chunk_size: usize) -> Result<String> {
        let raw = self.receive_all(chunk_size)?;
        Ok(String::from_utf8(Vec::from(raw))?)
    }

    /// Close the session
    pub fn close(&mut self) -> Result<()> {
        self.session.close()
    }

    /// Get a reference to the underlying session
    pub fn get_ref(&self) -> &S {
        &self.session
    }
}

/// Plain file descriptor session operations
pub struct FdSessionOps {
    stream: TcpStream,
}

impl FdSessionOps {
    /// Create a new FD session operations from a TCP stream
    pub fn new(stream: TcpStream) -> Self {
        FdSessionOps { stream }
    }
}

impl SessionOps for FdSessionOps {
    fn poll(&self, events: PollEvents, timeout: Option<Duration>) -> Result<bool> {
        use libc::{poll, pollfd, POLLIN, POLLOUT};

        let mut pfd = pollfd {
            fd: self.stream.as_raw_fd(),
            events: match events {
                PollEvents::Read => POLLIN,
                PollEvents::Write => POLLOUT,
            },
            revents: 0,
        };

        let timeout_ms = timeout
            .map(|d| d.as_millis().min(i32::MAX as u128) as i32)
            .unwrap_or(-1); // -1 = infinite

        let result = unsafe { poll(&mut pfd as *mut pollfd, 1, timeout_ms) };

        if result < 0 {
            return Err(Error::Io(io::Error::last_os_error()));
        }

        Ok(result > 0)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.stream.read(buf).map_err(Error::from)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.stream.write(buf).map_err(Error::from)
    }

    fn close(&mut self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            // The peer already tore the connection down
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other.map_err(Error::from),
        }
    }
}

/// Helper to create an HTTP session from a TCP stream
pub fn from_tcp_stream(stream: TcpStream) -> HttpSession<FdSessionOps> {
    HttpSession::new(FdSessionOps::new(stream))
}
