//! HTTP response parsing
//!
//! Turns the complete raw response text into an `HttpResponse`. Parsing
//! only happens once the server has closed the stream, so there is no
//! incremental state.

use super::{Error, HttpResponse, ResponseCode, Result, CRLF};
use std::num::IntErrorKind;

/// How the body is located in the raw response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// Last segment after splitting the whole response on CRLF
    ///
    /// Only reproduces single-line bodies without a trailing CRLF.
    #[default]
    LastSegment,
    /// Everything after the first blank line (`\r\n\r\n`)
    AfterHeaders,
}

impl BodyMode {
    /// Extract the body from a raw response
    pub fn extract<'a>(&self, raw: &'a str) -> &'a str {
        match self {
            BodyMode::LastSegment => raw.rsplit(CRLF).next().unwrap_or(""),
            BodyMode::AfterHeaders => raw
                .split_once("\r\n\r\n")
                .map(|(_, body)| body)
                .unwrap_or(""),
        }
    }
}

/// Parse the status code out of a status line
///
/// Format: VERSION SP STATUS SP REASON
/// Example: HTTP/1.1 200 OK
///
/// Any integer is accepted, including negative and out-of-range values;
/// integers too wide for `i64` saturate.
pub fn parse_status_line(line: &str) -> Result<i64> {
    let token = line
        .split(' ')
        .nth(1)
        .ok_or_else(|| Error::MalformedResponse(format!("Invalid status line: {:?}", line)))?;

    match token.parse::<i64>() {
        Ok(code) => Ok(code),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(i64::MAX),
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(i64::MIN),
        Err(_) => Err(Error::MalformedResponse(format!("Invalid status code: {:?}", token))),
    }
}

/// Parse a complete raw response
///
/// An empty response is reported as 404. Codes other than 200, 301, 302
/// and 404 are reported as 500 with an empty body.
pub fn parse_response(raw: &str, mode: BodyMode) -> Result<HttpResponse> {
    if raw.is_empty() {
        return Ok(HttpResponse::empty());
    }

    let status_line = raw.split(CRLF).next().unwrap_or(raw);
    let status = ResponseCode::from_code(parse_status_line(status_line)?);

    if let ResponseCode::Other(code) = status {
        tracing::warn!(code, "unrecognized status code, reporting 500");
    }

    Ok(HttpResponse::from_status(status, mode.extract(raw)))
}
