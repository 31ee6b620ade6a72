//! Outbound TCP connection establishment
//!
//! Resolves a `(host, port)` pair and connects to the first address that
//! accepts, using `socket2` so a connect deadline can be applied.

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Connection establishment errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("No addresses found for {0}")]
    NoAddress(String),

    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Socket error: {0}")]
    Socket(#[from] io::Error),
}

/// Resolve `host:port` into socket addresses
pub fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>, Error> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| Error::Resolve {
            host: host.to_string(),
            source,
        })?
        .collect();

    if addrs.is_empty() {
        return Err(Error::NoAddress(host.to_string()));
    }

    Ok(addrs)
}

/// Connect to a single address
pub fn connect_addr(addr: SocketAddr, timeout: Option<Duration>) -> Result<TcpStream, Error> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    let sock_addr = SockAddr::from(addr);

    let connected = match timeout {
        Some(timeout) => socket.connect_timeout(&sock_addr, timeout),
        None => socket.connect(&sock_addr),
    };
    connected.map_err(|source| Error::Connect { addr, source })?;

    socket.set_nodelay(true)?;

    Ok(TcpStream::from(socket))
}

/// Connect to `host:port`, trying every resolved address in order
///
/// The error from the last address tried is returned when none accept.
pub fn connect(host: &str, port: u16, timeout: Option<Duration>) -> Result<TcpStream, Error> {
    let mut last_err = None;

    for addr in resolve(host, port)? {
        tracing::debug!(%addr, "connecting");
        match connect_addr(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!(%addr, error = %e, "connect attempt failed");
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| Error::NoAddress(host.to_string())))
}
