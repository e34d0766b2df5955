// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned HTTP response, returning the base URL and a handle
/// resolving to the request line that was received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            if n == 0 {
                break buf.len();
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        head.lines().next().unwrap_or_default().to_string()
    });
    (format!("http://{addr}/docs"), handle)
}

/// A URL on a port nothing listens on.
async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

fn store(base_url: &str) -> HttpDocumentStore {
    HttpDocumentStore::new(client(Duration::from_secs(5)).unwrap(), base_url)
}

#[test]
fn test_document_url_trims_trailing_slash() {
    let store = store("https://api.test/docs/");
    assert_eq!(
        store.document_url("drivers", "d1"),
        "https://api.test/docs/drivers/d1"
    );
}

#[tokio::test]
async fn test_probe_succeeds_on_any_response() {
    let (url, server) = serve_once("503 Service Unavailable", "").await;
    let probe = HttpProbe::new(client(Duration::from_secs(5)).unwrap());

    assert!(probe.probe(&url).await.is_ok());
    assert!(server.await.unwrap().starts_with("HEAD /docs"));
}

#[tokio::test]
async fn test_probe_fails_when_unreachable() {
    let probe = HttpProbe::new(client(Duration::from_secs(5)).unwrap());
    let result = probe.probe(&closed_url().await).await;
    assert!(matches!(result, Err(ProbeError::Request(_))));
}

#[tokio::test]
async fn test_get_returns_document() {
    let (url, server) = serve_once("200 OK", r#"{"name":"A"}"#).await;

    let doc = store(&url).get("drivers", "d1").await.unwrap();

    assert_eq!(doc, Some(json!({"name": "A"})));
    assert_eq!(server.await.unwrap(), "GET /docs/drivers/d1 HTTP/1.1");
}

#[tokio::test]
async fn test_get_not_found_is_none() {
    let (url, _server) = serve_once("404 Not Found", "").await;
    assert_eq!(store(&url).get("drivers", "d1").await.unwrap(), None);
}

#[tokio::test]
async fn test_update_sends_put() {
    let (url, server) = serve_once("204 No Content", "").await;

    store(&url)
        .update("drivers", "d1", &json!({"name": "A"}))
        .await
        .unwrap();

    assert_eq!(server.await.unwrap(), "PUT /docs/drivers/d1 HTTP/1.1");
}

#[tokio::test]
async fn test_create_sends_post() {
    let (url, server) = serve_once("201 Created", "").await;

    store(&url)
        .create("drivers", "d1", &json!({"name": "A"}))
        .await
        .unwrap();

    assert_eq!(server.await.unwrap(), "POST /docs/drivers/d1 HTTP/1.1");
}

#[tokio::test]
async fn test_delete_of_missing_document_succeeds() {
    let (url, server) = serve_once("404 Not Found", "").await;

    store(&url).delete("drivers", "d1").await.unwrap();

    assert_eq!(server.await.unwrap(), "DELETE /docs/drivers/d1 HTTP/1.1");
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let (url, _server) = serve_once("500 Internal Server Error", "boom").await;

    let err = store(&url)
        .update("drivers", "d1", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RemoteError::Status {
            status: 500,
            body: "boom".to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_store_is_a_network_error() {
    let err = store(&closed_url().await)
        .update("drivers", "d1", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Network(_)));
}
