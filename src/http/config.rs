//! Client configuration
//!
//! This module provides the configuration builder for `HttpClient`.

use super::{BodyMode, RECV_CHUNK_SIZE};
use std::time::Duration;

/// Default deadline for connecting and for each read or write
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on a whole exchange, from resolving the URL to the last read
pub const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_secs(60);

/// Client configuration (immutable after building)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub(crate) connect_timeout: Option<Duration>,
    pub(crate) io_timeout: Option<Duration>,
    pub(crate) total_timeout: Option<Duration>,
    pub(crate) chunk_size: usize,
    pub(crate) body_mode: BodyMode,
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout
    }

    pub fn total_timeout(&self) -> Option<Duration> {
        self.total_timeout
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn body_mode(&self) -> BodyMode {
        self.body_mode
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfigBuilder::new().build()
    }
}

/// Client configuration builder
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
    total_timeout: Option<Duration>,
    chunk_size: usize,
    body_mode: BodyMode,
}

impl ClientConfigBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        ClientConfigBuilder {
            connect_timeout: Some(DEFAULT_TIMEOUT),
            io_timeout: Some(DEFAULT_TIMEOUT),
            total_timeout: Some(DEFAULT_TOTAL_TIMEOUT),
            chunk_size: RECV_CHUNK_SIZE,
            body_mode: BodyMode::default(),
        }
    }

    /// Set the connect deadline (`None` waits for the OS)
    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the deadline for each read and write (`None` blocks forever)
    pub fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Set the bound on the whole exchange (`None` leaves only the
    /// per-operation deadlines)
    pub fn total_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.total_timeout = timeout;
        self
    }

    /// Set the receive chunk size (clamped to at least 1)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Set how the body is extracted
    pub fn body_mode(mut self, mode: BodyMode) -> Self {
        self.body_mode = mode;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            connect_timeout: self.connect_timeout,
            io_timeout: self.io_timeout,
            total_timeout: self.total_timeout,
            chunk_size: self.chunk_size,
            body_mode: self.body_mode,
        }
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
