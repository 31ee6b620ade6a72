//! HTTP client implementation
//!
//! Every call is independent: resolve the URL, open a fresh connection,
//! send one request, read until the server closes, parse, close.

use super::parser::parse_response;
use super::session::{self, HttpSession, SessionOps};
use super::{ClientConfig, FormArgs, HttpRequest, HttpResponse, Method, Result, Target};
use crate::net;
use std::time::Instant;

/// HTTP client
///
/// Holds only configuration; no connection or state is kept between calls.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    /// Create a client with the default configuration
    pub fn new() -> Self {
        HttpClient {
            config: ClientConfig::default(),
        }
    }

    /// Create a client with a custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        HttpClient { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a GET request; `args` are accepted for symmetry and ignored
    pub fn get(&self, url: &str, args: Option<&FormArgs>) -> Result<HttpResponse> {
        self.request(Method::Get, url, args)
    }

    /// Send a POST request with optional form arguments
    pub fn post(&self, url: &str, args: Option<&FormArgs>) -> Result<HttpResponse> {
        self.request(Method::Post, url, args)
    }

    /// Dispatch by method name: `"POST"` posts, anything else is a GET
    pub fn command(&self, url: &str, method: &str, args: Option<&FormArgs>) -> Result<HttpResponse> {
        self.request(Method::from_command(method), url, args)
    }

    /// Run one full request/response exchange on a fresh connection
    pub fn request(&self, method: Method, url: &str, args: Option<&FormArgs>) -> Result<HttpResponse> {
        let deadline = self.config.total_timeout.and_then(|t| Instant::now().checked_add(t));
        let target = Target::resolve(url)?;
        tracing::debug!(%method, dest = %target, "opening connection");

        let stream = net::connect(target.host(), target.port(), self.config.connect_timeout)?;
        let mut session = session::from_tcp_stream(stream);
        session.set_timeout(self.config.io_timeout);
        session.set_deadline(deadline);

        let request = HttpRequest::new(method, target, args);
        let result = exchange(&mut session, &request, &self.config);

        if let Err(e) = session.close() {
            tracing::warn!(error = %e, "failed to close connection");
        }
        tracing::debug!("connection closed");

        result
    }
}

/// Send `request` over an open session, read the full reply and parse it
///
/// The raw response text is logged at INFO before parsing.
pub fn exchange<S: SessionOps>(
    session: &mut HttpSession<S>,
    request: &HttpRequest,
    config: &ClientConfig,
) -> Result<HttpResponse> {
    session.send_all(&request.to_wire())?;

    let raw = session.receive_text(config.chunk_size)?;
    tracing::info!(bytes = raw.len(), raw = ?raw, "received response");

    parse_response(&raw, config.body_mode)
}
