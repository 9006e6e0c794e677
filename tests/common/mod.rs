//! Shared test utilities and constants.

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tungstenite::Message;

/// Kraken public WebSocket endpoint URL.
pub const KRAKEN_WS_URL: &str = "wss://ws.kraken.com/";

/// What the mock exchange does after sending its scripted frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Keep reading client frames until the client goes away.
    StayOpen,
    /// Drop the TCP connection without a closing handshake.
    Reset,
}

/// Starts a one-connection WebSocket server on an ephemeral port.
///
/// The server sends `frames` in order, then behaves according to
/// `ending`. Every text frame received from the client is forwarded on
/// the returned channel.
pub async fn mock_exchange(
    frames: Vec<Message>,
    ending: Ending,
) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        for frame in frames {
            if ws.send(frame).await.is_err() {
                return;
            }
        }

        if ending == Ending::Reset {
            return;
        }

        while let Some(Ok(frame)) = ws.next().await {
            if let Message::Text(text) = frame {
                let _ = tx.send(text.to_string());
            }
        }
    });

    (format!("ws://{addr}"), rx)
}

/// Mock exchange that stays silent and only records client frames.
pub async fn recording_exchange() -> (String, mpsc::UnboundedReceiver<String>) {
    mock_exchange(Vec::new(), Ending::StayOpen).await
}

/// One HTTP request as seen by [`mock_rest`]. Header names are lowercased.
#[derive(Debug)]
pub struct HttpRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Starts a one-request HTTP server on an ephemeral port.
///
/// It answers with `status` (e.g. `"200 OK"`) and a JSON `body`, closes
/// the connection, then hands the captured request to the receiver.
pub async fn mock_rest(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<HttpRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let Some(request) = read_request(&mut stream).await else {
            return;
        };

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        let _ = tx.send(request);
    });

    (format!("http://{addr}"), rx)
}

async fn read_request(stream: &mut TcpStream) -> Option<HttpRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_len = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_len]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_len + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(HttpRequest {
        request_line,
        headers,
        body: String::from_utf8_lossy(&buf[head_len..head_len + content_length]).to_string(),
    })
}
