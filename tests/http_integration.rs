//! Integration tests for the HTTP client
//!
//! Each test starts a one-shot server on a loopback port. The server reads
//! one request, hands its raw bytes back to the test, writes a canned reply
//! and closes the connection.

use minihttp::http::{BodyMode, ClientConfig, Error, FormArgs, HttpClient, HttpResponse};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Read one request: headers up to the blank line, then Content-Length bytes
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 512];

    loop {
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|l| l.strip_prefix("Content-Length: "))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                return text;
            }
        }

        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            return String::from_utf8_lossy(&buf).to_string();
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Serve one connection with `reply`, returning the request it received
fn serve_once(reply: &'static [u8]) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        stream.write_all(reply).unwrap();
        request
    });

    (format!("http://{}", addr), handle)
}

#[test]
fn test_get_round_trip() {
    let (base, server) = serve_once(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 11\r\n\r\nHello World");

    let response = HttpClient::new().get(&format!("{base}/test?q=1"), None).unwrap();
    assert_eq!(response, HttpResponse::new(200, "Hello World"));

    let request = server.join().unwrap();
    assert_eq!(
        request,
        "GET /test?q=1 HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n"
    );
}

#[test]
fn test_get_root_path() {
    let (base, server) = serve_once(b"HTTP/1.1 200 OK\r\n\r\nroot");

    let response = HttpClient::new().get(&base, None).unwrap();
    assert_eq!(response.body(), "root");

    let request = server.join().unwrap();
    assert!(request.starts_with("GET / HTTP/1.1\r\n"));
}

#[test]
fn test_post_with_form_args() {
    let (base, server) = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 8\r\n\r\nReceived");

    let mut args = FormArgs::new();
    args.insert("a", "1");
    args.insert("b", "two words");

    let response = HttpClient::new().post(&format!("{base}/data"), Some(&args)).unwrap();
    assert_eq!(response, HttpResponse::new(200, "Received"));

    let request = server.join().unwrap();
    assert_eq!(
        request,
        "POST /data HTTP/1.1\r\n\
         Host: 127.0.0.1\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\
         Content-Length: 15\r\n\
         Connection: close\r\n\
         \r\n\
         a=1&b=two+words"
    );
}

#[test]
fn test_post_without_args() {
    let (base, server) = serve_once(b"HTTP/1.1 200 OK\r\n\r\nok");

    let response = HttpClient::new().post(&format!("{base}/empty"), None).unwrap();
    assert_eq!(response.body(), "ok");

    let request = server.join().unwrap();
    assert_eq!(
        request,
        "POST /empty HTTP/1.1\r\nHost: 127.0.0.1\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
}

#[test]
fn test_command_dispatch() {
    let (base, server) = serve_once(b"HTTP/1.1 200 OK\r\n\r\nposted");
    let response = HttpClient::new().command(&base, "POST", None).unwrap();
    assert_eq!(response.body(), "posted");
    assert!(server.join().unwrap().starts_with("POST / HTTP/1.1\r\n"));

    let (base, server) = serve_once(b"HTTP/1.1 200 OK\r\n\r\nfetched");
    let response = HttpClient::new().command(&base, "DELETE", None).unwrap();
    assert_eq!(response.body(), "fetched");
    assert!(server.join().unwrap().starts_with("GET / HTTP/1.1\r\n"));
}

#[test]
fn test_404_drops_body() {
    let (base, server) = serve_once(b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nNot Found");

    let response = HttpClient::new().get(&format!("{base}/notfound"), None).unwrap();
    assert_eq!(response, HttpResponse::new(404, ""));

    server.join().unwrap();
}

#[test]
fn test_redirect_keeps_body() {
    let (base, server) = serve_once(b"HTTP/1.1 302 Found\r\nLocation: /elsewhere\r\n\r\nsee elsewhere");

    let response = HttpClient::new().get(&base, None).unwrap();
    assert_eq!(response, HttpResponse::new(302, "see elsewhere"));

    server.join().unwrap();
}

#[test]
fn test_unrecognized_status_becomes_500() {
    let (base, server) = serve_once(b"HTTP/1.1 503 Service Unavailable\r\n\r\ntry later");

    let response = HttpClient::new().get(&base, None).unwrap();
    assert_eq!(response, HttpResponse::new(500, ""));

    server.join().unwrap();
}

#[test]
fn test_empty_reply_is_404() {
    let (base, server) = serve_once(b"");

    let response = HttpClient::new().get(&base, None).unwrap();
    assert_eq!(response, HttpResponse::new(404, ""));

    server.join().unwrap();
}

#[test]
fn test_large_body_spans_many_reads() {
    static REPLY: std::sync::OnceLock<Vec<u8>> = std::sync::OnceLock::new();
    let reply = REPLY.get_or_init(|| {
        let body = "Hello World".repeat(500);
        format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}", body.len(), body).into_bytes()
    });

    let (base, server) = serve_once(reply);

    let response = HttpClient::new().get(&base, None).unwrap();
    assert_eq!(response.code(), 200);
    assert_eq!(response.body(), "Hello World".repeat(500));

    server.join().unwrap();
}

#[test]
fn test_after_headers_body_mode() {
    let (base, server) = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\none\r\ntwo\r\n");

    let config = ClientConfig::builder().body_mode(BodyMode::AfterHeaders).build();
    let response = HttpClient::with_config(config).get(&base, None).unwrap();
    assert_eq!(response.body(), "one\r\ntwo\r\n");

    server.join().unwrap();
}

#[test]
fn test_malformed_status_line() {
    let (base, server) = serve_once(b"HTTP/1.1 OK\r\n\r\nbody");

    let err = HttpClient::new().get(&base, None).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));

    server.join().unwrap();
}

#[test]
fn test_connection_refused() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = HttpClient::new()
        .get(&format!("http://127.0.0.1:{port}/"), None)
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[test]
fn test_server_that_never_closes_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request(&mut stream);
        stream.write_all(b"HTTP/1.1 200 OK\r\n\r\npartial").unwrap();
        // Hold the connection open past the client's deadline
        thread::sleep(Duration::from_millis(500));
    });

    let config = ClientConfig::builder()
        .io_timeout(Some(Duration::from_millis(100)))
        .build();
    let err = HttpClient::with_config(config)
        .get(&format!("http://{addr}/"), None)
        .unwrap_err();
    assert!(matches!(err, Error::Timeout));

    server.join().unwrap();
}

#[test]
fn test_trickling_server_hits_total_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request(&mut stream);
        // Each byte arrives well within the per-read timeout
        for _ in 0..100 {
            if stream.write_all(b"x").is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(30));
        }
    });

    let config = ClientConfig::builder()
        .io_timeout(Some(Duration::from_secs(1)))
        .total_timeout(Some(Duration::from_millis(200)))
        .build();

    let start = Instant::now();
    let err = HttpClient::with_config(config)
        .get(&format!("http://{addr}/"), None)
        .unwrap_err();
    assert!(matches!(err, Error::Timeout));
    assert!(start.elapsed() < Duration::from_secs(1));

    server.join().unwrap();
}
