//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Read one HTTP request from the socket and return its request line,
/// e.g. "GET /services?namespace=default".
async fn read_request_line(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 1024];

    let head_end = loop {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();

    // Drain the body so the client finishes its write cleanly.
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    let mut remaining = content_length.saturating_sub(buf.len() - (head_end + 4));
    while remaining > 0 {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            break;
        }
        remaining = remaining.saturating_sub(n);
    }

    let request_line = head.lines().next()?;
    // Strip the trailing HTTP version.
    let without_version = request_line.rsplit_once(' ')?.0;
    Some(without_version.to_string())
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        409 => "409 Conflict",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a backend that records every request line and answers with a fixed
/// status and body. Returns the shared request log.
pub async fn start_recording_backend(
    addr: SocketAddr,
    status: u16,
    body: &'static str,
) -> Arc<Mutex<Vec<String>>> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_handle = log.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = log_handle.clone();
                    tokio::spawn(async move {
                        if let Some(line) = read_request_line(&mut socket).await {
                            log.lock().unwrap().push(line);
                        }
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    log
}

/// Start a backend that echoes the request line back as the response body.
pub async fn start_echo_backend(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let line = read_request_line(&mut socket)
                            .await
                            .unwrap_or_default();
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            line.len(),
                            line
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a backend that sends a 200 head and the first few body bytes,
/// then stalls without ever finishing the body.
#[allow(dead_code)]
pub async fn start_stalling_backend(addr: SocketAddr, content_length: usize, partial: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = read_request_line(&mut socket).await;
                        let head = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
                            content_length, partial
                        );
                        let _ = socket.write_all(head.as_bytes()).await;
                        tokio::time::sleep(Duration::from_secs(120)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a backend that accepts connections but never responds.
#[allow(dead_code)]
pub async fn start_silent_backend(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = read_request_line(&mut socket).await;
                        tokio::time::sleep(Duration::from_secs(120)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
