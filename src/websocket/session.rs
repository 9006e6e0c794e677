//! Streaming session over one WebSocket connection.
//!
//! [`Session`] owns two background tasks: a read loop that decodes every
//! inbound frame and a keep-alive loop that pings on a fixed interval.
//! Both report through a single unbounded channel, so decoded messages,
//! decode errors and the final disconnect are observed by the consumer
//! in the order they occurred.
//!
//! The session never reconnects on its own. After
//! [`SessionEvent::Disconnected`] the channel closes and
//! [`Session::next_event`] returns `None`; reconnection policy belongs to
//! the caller (see the `krakenfeed` binary).

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::{Mutex, mpsc};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tungstenite::Message as WsMessage;

use super::{
    WsReader, WsWriter, add_order, cancel_all, cancel_order, connect, ping, send, subscribe,
    unsubscribe,
};
use crate::config::SessionConfig;
use crate::decode::decode_str;
use crate::models::{AddOrder, CancelAll, CancelOrder, Message, RedactedToken, Subscription};
use crate::{FeedError, Result};

/// One item delivered by [`Session::next_event`].
#[derive(Debug)]
pub enum SessionEvent {
    /// A successfully decoded frame.
    Message(Message),
    /// A frame that failed to decode, or a failed keep-alive ping.
    Error(FeedError),
    /// A binary frame; the protocol only uses text.
    UnsupportedFrame,
    /// The connection is gone. Always the last event of a session.
    Disconnected { reason: String },
}

/// An open connection with its read and keep-alive tasks.
pub struct Session {
    writer: Arc<Mutex<WsWriter>>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    reader: JoinHandle<()>,
    keepalive: JoinHandle<()>,
    token: Option<RedactedToken>,
    verbose: bool,
}

impl Session {
    /// Connects to a public stream.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError::WebSocket`] if the connection or handshake fails.
    pub async fn connect(config: &SessionConfig) -> Result<Self> {
        Self::open(config, None).await
    }

    /// Connects to the private stream. `token` is injected into every
    /// subscribe, unsubscribe and order request sent through this session.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError::WebSocket`] if the connection or handshake fails.
    pub async fn connect_private(config: &SessionConfig, token: &str) -> Result<Self> {
        Self::open(config, Some(RedactedToken::new(token))).await
    }

    async fn open(config: &SessionConfig, token: Option<RedactedToken>) -> Result<Self> {
        let (write, read) = connect(&config.url).await?;
        let writer = Arc::new(Mutex::new(write));
        let (tx, events) = mpsc::unbounded_channel();

        let keepalive = tokio::spawn(keepalive_loop(
            writer.clone(),
            tx.clone(),
            config.keepalive_interval,
            config.verbose,
        ));
        let reader = tokio::spawn(read_loop(
            read,
            tx,
            keepalive.abort_handle(),
            config.verbose,
        ));

        info!(
            url = %config.url,
            private = token.is_some(),
            keepalive_secs = config.keepalive_interval.as_secs(),
            "Session started"
        );

        Ok(Self {
            writer,
            events,
            reader,
            keepalive,
            token,
            verbose: config.verbose,
        })
    }

    /// Sends any serializable request as one text frame.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if serialization or sending fails.
    pub async fn send<T: Serialize>(&self, request: &T) -> Result<()> {
        let mut write = self.writer.lock().await;
        send(&mut write, request, self.verbose).await
    }

    /// Subscribes `pairs` to a channel, adding the session token if any.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if sending fails.
    pub async fn subscribe(&self, pairs: &[String], subscription: Subscription) -> Result<()> {
        let mut write = self.writer.lock().await;
        subscribe(
            &mut write,
            pairs,
            subscription,
            self.token.as_ref(),
            self.verbose,
        )
        .await
    }

    /// Unsubscribes `pairs` from a channel, adding the session token if any.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if sending fails.
    pub async fn unsubscribe(&self, pairs: &[String], subscription: Subscription) -> Result<()> {
        let mut write = self.writer.lock().await;
        unsubscribe(
            &mut write,
            pairs,
            subscription,
            self.token.as_ref(),
            self.verbose,
        )
        .await
    }

    /// Places an order; the reply arrives as [`Message::AddOrderStatus`].
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Auth`] on a public session, or a
    /// [`FeedError`] if sending fails.
    pub async fn add_order(&self, request: AddOrder) -> Result<()> {
        let token = self.private_token("addOrder")?;
        let mut write = self.writer.lock().await;
        add_order(&mut write, request, token, self.verbose).await
    }

    /// Cancels orders; the reply arrives as [`Message::CancelOrderStatus`].
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Auth`] on a public session, or a
    /// [`FeedError`] if sending fails.
    pub async fn cancel_order(&self, request: CancelOrder) -> Result<()> {
        let token = self.private_token("cancelOrder")?;
        let mut write = self.writer.lock().await;
        cancel_order(&mut write, request, token, self.verbose).await
    }

    /// Cancels every open order; the reply arrives as
    /// [`Message::CancelAllStatus`].
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Auth`] on a public session, or a
    /// [`FeedError`] if sending fails.
    pub async fn cancel_all(&self, request: CancelAll) -> Result<()> {
        let token = self.private_token("cancelAll")?;
        let mut write = self.writer.lock().await;
        cancel_all(&mut write, request, token, self.verbose).await
    }

    fn private_token(&self, event: &str) -> Result<&RedactedToken> {
        self.token
            .as_ref()
            .ok_or_else(|| FeedError::Auth(format!("{event} requires a private session")))
    }

    /// Sends a ping; the reply arrives as [`Message::Pong`].
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if sending fails.
    pub async fn ping(&self, reqid: Option<u64>) -> Result<()> {
        let mut write = self.writer.lock().await;
        ping(&mut write, reqid, self.verbose).await
    }

    /// Waits for the next event. Returns `None` once the connection is
    /// gone and every queued event has been consumed.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Sends a close frame and stops both background tasks.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError::WebSocket`] if the close frame cannot be
    /// sent on a connection that is still open.
    pub async fn close(self) -> Result<()> {
        let result = {
            let mut write = self.writer.lock().await;
            write.send(WsMessage::Close(None)).await
        };
        info!("Session closed");

        match result {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed)
            | Err(tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.reader.abort();
        self.keepalive.abort();
    }
}

/// Decodes inbound frames until the connection ends, then emits a single
/// [`SessionEvent::Disconnected`] and stops the keep-alive task.
async fn read_loop(
    mut read: WsReader,
    tx: mpsc::UnboundedSender<SessionEvent>,
    keepalive: AbortHandle,
    verbose: bool,
) {
    let reason = loop {
        let event = match read.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                if verbose {
                    debug!(frame = %text.as_str(), "Received frame");
                }
                match decode_str(text.as_str()) {
                    Ok(message) => SessionEvent::Message(message),
                    Err(e) => {
                        warn!(error = %e, "Failed to decode frame");
                        SessionEvent::Error(e.into())
                    }
                }
            }
            Some(Ok(WsMessage::Binary(bytes))) => {
                debug!(len = bytes.len(), "Received binary frame");
                SessionEvent::UnsupportedFrame
            }
            Some(Ok(WsMessage::Close(frame))) => {
                break match frame {
                    Some(frame) => format!(
                        "closed by peer ({}): {}",
                        u16::from(frame.code),
                        frame.reason.as_str()
                    ),
                    None => "closed by peer".to_string(),
                };
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!("WebSocket error: {e}");
                break e.to_string();
            }
            None => break "stream ended".to_string(),
        };

        if tx.send(event).is_err() {
            keepalive.abort();
            return;
        }
    };

    keepalive.abort();
    info!(%reason, "WebSocket disconnected");
    let _ = tx.send(SessionEvent::Disconnected { reason });
}

/// Pings every `period`. The first ping goes out one period after start.
async fn keepalive_loop(
    writer: Arc<Mutex<WsWriter>>,
    tx: mpsc::UnboundedSender<SessionEvent>,
    period: Duration,
    verbose: bool,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let result = {
            let mut write = writer.lock().await;
            ping(&mut write, None, verbose).await
        };

        if let Err(e) = result {
            warn!("Keep-alive ping failed: {e}");
            let _ = tx.send(SessionEvent::Error(FeedError::KeepAlive(e.to_string())));
            return;
        }
    }
}
