use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;

use fixture_extract::api::{ApiClient, HttpApiClient};
use fixture_extract::error::ExtractError;

/// Serves a single canned HTTP response and hands back the requested path.
fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
    serve_bytes_once(status, body.as_bytes())
}

fn serve_bytes_once(status: &str, body: &[u8]) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());
    let mut response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = stream.read(&mut buf).unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
        }
        stream.write_all(&response).unwrap();
        let request = String::from_utf8_lossy(&request).to_string();
        request
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_string()
    });
    (base_url, handle)
}

#[test]
fn decodes_success_body() {
    let (base_url, server) = serve_once("200 OK", r#"{"id": 30, "name": "Café"}"#);
    let client = HttpApiClient::new(&base_url).unwrap();

    let document = client.get_json("/merchants/30").unwrap();

    assert_eq!(document, json!({"id": 30, "name": "Café"}));
    assert_eq!(server.join().unwrap(), "/api/merchants/30");
}

#[test]
fn non_success_status_is_status_error() {
    let (base_url, server) = serve_once("404 Not Found", r#"{"detail": "not found"}"#);
    let client = HttpApiClient::new(&base_url).unwrap();

    let err = client.get_json("/transactions/missing").unwrap_err();

    assert_matches!(err, ExtractError::Status { status: 404, .. });
    server.join().unwrap();
}

#[test]
fn malformed_body_is_decode_error() {
    let (base_url, server) = serve_once("200 OK", "<html>oops</html>");
    let client = HttpApiClient::new(&base_url).unwrap();

    let err = client.get_json("/merchants").unwrap_err();

    assert_matches!(err, ExtractError::Decode { .. });
    server.join().unwrap();
}

#[test]
fn invalid_utf8_body_is_decode_error() {
    let (base_url, server) = serve_bytes_once("200 OK", b"{\"name\": \"caf\xe9\"}");
    let client = HttpApiClient::new(&base_url).unwrap();

    let err = client.get_json("/merchants/30").unwrap_err();

    assert_matches!(err, ExtractError::Decode { .. });
    server.join().unwrap();
}

#[test]
fn empty_body_is_decode_error() {
    let (base_url, server) = serve_once("200 OK", "");
    let client = HttpApiClient::new(&base_url).unwrap();

    let err = client.get_json("/merchants").unwrap_err();

    assert_matches!(err, ExtractError::Decode { .. });
    server.join().unwrap();
}

#[test]
fn refused_connection_is_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client =
        HttpApiClient::with_timeout(&format!("http://{addr}/api"), Duration::from_secs(5)).unwrap();

    let err = client.get_json("/merchants").unwrap_err();

    assert_matches!(err, ExtractError::Transport { .. });
}
