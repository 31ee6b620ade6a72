//! HTTP message types
//!
//! This module defines the request that is serialized onto the wire and the
//! response value handed back to callers.

use super::form::{FormArgs, FORM_CONTENT_TYPE};
use super::{Headers, Target, CRLF};
use std::fmt;

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Select the method for a command name
    ///
    /// Only an exact `"POST"` selects POST; anything else falls back to GET.
    pub fn from_command(name: &str) -> Self {
        match name {
            "POST" => Method::Post,
            _ => Method::Get,
        }
    }

    /// Convert method to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status codes the client distinguishes
///
/// Every other code collapses into `Other`, which is reported to callers
/// as 500 with an empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Ok,
    MovedPermanently,
    Found,
    NotFound,
    Other(i64),
}

impl ResponseCode {
    /// Classify a numeric status code
    pub fn from_code(code: i64) -> Self {
        match code {
            200 => ResponseCode::Ok,
            301 => ResponseCode::MovedPermanently,
            302 => ResponseCode::Found,
            404 => ResponseCode::NotFound,
            other => ResponseCode::Other(other),
        }
    }

    /// Code reported to callers
    pub fn code(&self) -> u16 {
        match self {
            ResponseCode::Ok => 200,
            ResponseCode::MovedPermanently => 301,
            ResponseCode::Found => 302,
            ResponseCode::NotFound => 404,
            ResponseCode::Other(_) => 500,
        }
    }

    /// Whether the response body is passed through to callers
    pub fn keeps_body(&self) -> bool {
        matches!(
            self,
            ResponseCode::Ok | ResponseCode::MovedPermanently | ResponseCode::Found
        )
    }
}

/// HTTP request
///
/// Holds everything needed to produce the exact bytes sent to the server.
/// The builder methods always add `Connection: close` last; the receive
/// loop relies on the server closing the stream after responding.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    target: Target,
    headers: Headers,
    body: String,
}

impl HttpRequest {
    /// Build a GET request
    pub fn get(target: Target) -> Self {
        let mut headers = Headers::new();
        headers.insert("Host", target.host_header());
        headers.insert("Connection", "close");

        HttpRequest {
            method: Method::Get,
            target,
            headers,
            body: String::new(),
        }
    }

    /// Build a POST request
    ///
    /// Non-empty args become a form-encoded body; otherwise the request is
    /// sent with `Content-Length: 0` and no body.
    pub fn post(target: Target, args: Option<&FormArgs>) -> Self {
        let mut headers = Headers::new();
        headers.insert("Host", target.host_header());

        let body = match args.filter(|a| !a.is_empty()) {
            Some(args) => {
                let body = args.encode();
                headers.insert("Content-Type", FORM_CONTENT_TYPE);
                headers.insert("Content-Length", body.len().to_string());
                body
            }
            None => {
                headers.insert("Content-Length", "0");
                String::new()
            }
        };
        headers.insert("Connection", "close");

        HttpRequest {
            method: Method::Post,
            target,
            headers,
            body,
        }
    }

    /// Build a request for `method`; args are only used by POST
    pub fn new(method: Method, target: Target, args: Option<&FormArgs>) -> Self {
        match method {
            Method::Get => HttpRequest::get(target),
            Method::Post => HttpRequest::post(target, args),
        }
    }

    /// Get the request method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Get the connection target
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Get the headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get the body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Convert the request to wire format
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128 + self.body.len());

        // Request line
        buf.extend_from_slice(self.method.as_str().as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.target.path().as_bytes());
        buf.extend_from_slice(b" HTTP/1.1");
        buf.extend_from_slice(CRLF.as_bytes());

        self.headers.write_to(&mut buf);

        // Empty line
        buf.extend_from_slice(CRLF.as_bytes());

        buf.extend_from_slice(self.body.as_bytes());

        buf
    }
}

/// HTTP response as seen by callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    code: u16,
    body: String,
}

impl HttpResponse {
    /// Create a response from a code and body
    pub fn new(code: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            code,
            body: body.into(),
        }
    }

    /// Response for an empty reply from the server
    pub fn empty() -> Self {
        HttpResponse::new(404, "")
    }

    /// Apply the status mapping to a parsed code and candidate body
    pub fn from_status(code: ResponseCode, body: impl Into<String>) -> Self {
        if code.keeps_body() {
            HttpResponse::new(code.code(), body)
        } else {
            HttpResponse::new(code.code(), "")
        }
    }

    /// Get the status code
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Get the body
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        HttpResponse::new(200, "")
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.code)?;
        write!(f, "{}", self.body)
    }
}
