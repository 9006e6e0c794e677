//! Async WebSocket client for the Kraken v1 public and private streams.
//!
//! This module is organized by concern:
//! - [`subscription`] - Channel subscribe/unsubscribe requests
//! - [`trading`] - Order placement and cancellation on the private stream
//! - [`session`] - Read loop, keep-alive loop and the ordered event channel

mod session;
mod subscription;
mod trading;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use tungstenite::Message;

use crate::Result;
use crate::models::Ping;

pub use session::{Session, SessionEvent};
pub use subscription::{subscribe, unsubscribe};
pub use trading::{add_order, cancel_all, cancel_order};

/// Write half of a Kraken WebSocket connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a Kraken WebSocket connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// # Errors
///
/// Returns a [`FeedError`](crate::FeedError) if the connection or TLS handshake fails.
pub async fn connect(url: &str) -> Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = connect_async(url).await?;
    info!(url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}

/// Serializes `request` and sends it as one text frame.
///
/// With `verbose` set, the raw frame is logged at `debug` level.
///
/// # Errors
///
/// Returns a [`FeedError`](crate::FeedError) if serialization or sending fails.
pub async fn send<T: Serialize>(write: &mut WsWriter, request: &T, verbose: bool) -> Result<()> {
    let json = serde_json::to_string(request)?;
    if verbose {
        debug!(frame = %json, "Sending frame");
    }
    write.send(Message::Text(json.into())).await?;

    Ok(())
}

/// Sends a ping message over the WebSocket to test connection liveness.
///
/// # Errors
///
/// Returns a [`FeedError`](crate::FeedError) if sending the message fails.
pub async fn ping(write: &mut WsWriter, reqid: Option<u64>, verbose: bool) -> Result<()> {
    let request = match reqid {
        Some(reqid) => Ping::new().with_reqid(reqid),
        None => Ping::new(),
    };
    send(write, &request, verbose).await?;
    debug!(?reqid, "Sent ping");

    Ok(())
}
