//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned Traefik health payload.
#[allow(dead_code)]
pub fn health_body(current: &[(&str, f64)], total: &[(&str, f64)], uptime: f64) -> String {
    let map = |pairs: &[(&str, f64)]| {
        pairs
            .iter()
            .map(|(code, n)| format!("\"{}\": {}", code, n))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        r#"{{"pid": 1, "uptime": "1m", "uptime_sec": {}, "status_code_count": {{{}}}, "total_status_code_count": {{{}}}, "total_response_time_sec": 2.5, "average_response_time_sec": 0.05}}"#,
        uptime,
        map(current),
        map(total)
    )
}

/// Start a mock upstream on an ephemeral port. Every connection gets the
/// `(status, body)` produced by `f`.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Drain the request head before answering.
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");

                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock upstream that always answers with the same response.
#[allow(dead_code)]
pub async fn start_fixed_upstream(status: u16, body: String) -> SocketAddr {
    let body: Arc<str> = Arc::from(body);
    start_programmable_upstream(move || {
        let body = body.clone();
        async move { (status, body.to_string()) }
    })
    .await
}

/// Start a mock upstream that answers every request with `status` and a
/// `Location` header built from its own address by `location`.
#[allow(dead_code)]
pub async fn start_redirecting_upstream<F>(status: u16, location: F) -> SocketAddr
where
    F: Fn(SocketAddr) -> Option<String> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let location = location(addr);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let location = location.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;

                let header = location
                    .map(|l| format!("Location: {}\r\n", l))
                    .unwrap_or_default();
                let response_str = format!(
                    "HTTP/1.1 {} Redirect\r\n{}Content-Length: 0\r\nConnection: close\r\n\r\n",
                    status, header
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[allow(dead_code)]
pub fn health_uri(addr: SocketAddr) -> axum::http::Uri {
    format!("http://{}/health", addr).parse().unwrap()
}
