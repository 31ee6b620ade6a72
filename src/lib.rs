//! minihttp - a minimal HTTP/1.1 client
//!
//! This crate builds HTTP/1.1 requests by hand, sends them over a plain
//! TCP connection and parses the raw response back into a status code and
//! body. One request is issued per connection.

pub mod http;
pub mod net;
