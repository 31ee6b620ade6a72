//! URL decomposition
//!
//! Splits an absolute URL into the connection target (host, port) and the
//! resource path sent on the request line.

use super::{Error, Result, DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT};
use std::fmt;
use url::{Host, Url};

/// Connection target derived from a URL
///
/// `path` always starts with `/` and carries the query string, if any,
/// exactly as it appeared in the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    host: String,
    port: u16,
    path: String,
}

impl Target {
    /// Create a target from its parts
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        let path = path.into();
        Target {
            host: host.into(),
            port,
            path: if path.is_empty() { "/".to_string() } else { path },
        }
    }

    /// Resolve an absolute URL into host, port and path
    ///
    /// Without an explicit port, `http` maps to 80 and `https` to 443. Any
    /// other scheme must carry its port in the URL.
    ///
    /// The path is normalized the way `url::Url` does it: `.` and `..`
    /// segments are removed and characters outside the path set are
    /// percent-encoded, so `/a/../b/./c` is requested as `/b/c`.
    pub fn resolve(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;

        let host = match parsed.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(Error::InvalidUrl(format!("{url}: missing host"))),
        };

        let port = match parsed.port() {
            Some(port) => port,
            None => default_port(parsed.scheme())?,
        };

        let mut path = parsed.path().to_string();
        if path.is_empty() {
            path.push('/');
        }
        if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
            path.push('?');
            path.push_str(query);
        }

        Ok(Target { host, port, path })
    }

    /// Host name or address, without brackets or port
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Value for the `Host` header: the host, bracketed when it is an IPv6
    /// literal
    pub fn host_header(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }

    /// TCP port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resource path including the query string
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}{}", self.host, self.port, self.path)
        } else {
            write!(f, "{}:{}{}", self.host, self.port, self.path)
        }
    }
}

/// Default port for a scheme
pub fn default_port(scheme: &str) -> Result<u16> {
    match scheme {
        "http" => Ok(DEFAULT_HTTP_PORT),
        "https" => Ok(DEFAULT_HTTPS_PORT),
        other => Err(Error::UnsupportedScheme(other.to_string())),
    }
}
