//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Requests captured by a mock downstream, as raw HTTP text.
pub type Captured = Arc<Mutex<Vec<String>>>;

pub fn captured() -> Captured {
    Arc::new(Mutex::new(Vec::new()))
}

/// Start a mock downstream hop answering every request with a fixed JSON
/// envelope, recording each raw request it sees.
#[allow(dead_code)]
pub async fn start_json_backend(addr: SocketAddr, status: u16, body: &'static str) -> Captured {
    start_json_backend_with_delay(addr, status, body, Duration::ZERO).await
}

/// Same, but sleeps before answering to provoke forward timeouts.
#[allow(dead_code)]
pub async fn start_json_backend_with_delay(
    addr: SocketAddr,
    status: u16,
    body: &'static str,
    delay: Duration,
) -> Captured {
    let requests = captured();
    let listener = TcpListener::bind(addr).await.unwrap();
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        let request = read_request(&mut socket).await;
                        seen.lock().unwrap().push(request);

                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }

                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            403 => "403 Forbidden",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
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

    requests
}

/// Read one HTTP request (headers + content-length body) as text.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }

        if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let lower = line.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= pos + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
