//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request seen by the mock proxy.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

pub type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

/// Start a mock signing proxy on an ephemeral port.
///
/// `respond` maps each request to a status code and JSON body. Every request
/// is recorded before it is answered.
pub async fn start_mock_proxy<F>(respond: F) -> (SocketAddr, Recorder)
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let rec = recorder.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let rec = rec.clone();
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        handle_connection(socket, rec, respond).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, recorder)
}

/// Start a proxy that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_silent_proxy() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            });
        }
    });

    addr
}

async fn handle_connection<F>(mut socket: TcpStream, recorder: Recorder, respond: Arc<F>)
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let request = match read_request(&mut socket).await {
        Some(request) => request,
        None => return,
    };

    recorder.lock().unwrap().push(request.clone());
    let (status, body) = respond(&request);

    let status_text = match status {
        200 => "200 OK",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
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
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = (header_end + content_length).min(buf.len());
    let body = if content_length > 0 {
        serde_json::from_slice(&buf[header_end..body_end]).ok()
    } else {
        None
    };

    Some(RecordedRequest { method, path, body })
}
