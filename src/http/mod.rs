//! HTTP/1.1 client implementation
//!
//! This module builds requests by hand, sends them over a single-use TCP
//! connection and parses the raw response into a status code and body.
//!
//! # Architecture
//!
//! Each call runs the same pipeline:
//!
//! - `Target::resolve` splits the URL into host, port and resource path
//! - `crate::net::connect` opens the connection
//! - `HttpRequest::to_wire` produces the exact request bytes
//! - `HttpSession` sends them and reads until the peer closes
//! - `parser::parse_response` turns the raw text into an `HttpResponse`
//!
//! The session operations abstraction (`SessionOps`) keeps the send/receive
//! code independent of the underlying transport.
//!
//! # Examples
//!
//! ```no_run
//! use minihttp::http::{FormArgs, HttpClient};
//!
//! let client = HttpClient::new();
//!
//! let response = client.get("http://example.com/", None).unwrap();
//! println!("{}", response.code());
//!
//! let mut args = FormArgs::new();
//! args.insert("name", "value");
//! let response = client.post("http://example.com/submit", Some(&args)).unwrap();
//! println!("{}", response.body());
//! ```

pub mod client;
pub mod config;
pub mod form;
pub mod headers;
pub mod message;
pub mod parser;
pub mod session;
pub mod target;

pub use client::HttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use form::FormArgs;
pub use headers::Headers;
pub use message::{HttpRequest, HttpResponse, Method, ResponseCode};
pub use parser::BodyMode;
pub use session::{HttpSession, SessionOps};
pub use target::Target;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP operation errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] crate::net::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No default port for scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Timeout")]
    Timeout,

    #[error("Connection closed")]
    ConnectionClosed,
}

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Default HTTPS port
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Bytes requested from the socket per read
pub const RECV_CHUNK_SIZE: usize = 1024;

/// CRLF line ending
pub const CRLF: &str = "\r\n";
