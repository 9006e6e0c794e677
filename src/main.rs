use std::time::Duration;

use tracing::{debug, error, info, warn};

use krakenfeed::FeedError;
use krakenfeed::config::fetch_config;
use krakenfeed::models::{Message, Subscription};
use krakenfeed::orderbook::{BookError, OrderBook};
use krakenfeed::websocket::{Session, SessionEvent};

const DEFAULT_PAIR: &str = "XBT/EUR";
const DEFAULT_DEPTH: u32 = 10;
const TOP_LEVELS: usize = 5;

/// Initial backoff duration between reconnection attempts.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum backoff duration between reconnection attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Why a session ended.
enum DisconnectReason {
    /// The connection was lost or errored.
    ConnectionLost(String),
    /// The local book diverged from the exchange and must be rebuilt.
    Resync,
    /// Interrupted by the user.
    Shutdown,
}

#[tokio::main]
async fn main() -> Result<(), FeedError> {
    tracing_subscriber::fmt::init();

    let app_config = fetch_config()?;

    let mut args = std::env::args().skip(1);
    let pair = args.next().unwrap_or_else(|| DEFAULT_PAIR.to_string());
    let depth = match args.next() {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            FeedError::Config(format!("depth must be a positive integer, got `{raw}`"))
        })?,
        None => DEFAULT_DEPTH,
    };

    let session_config = app_config.kraken.public_session();
    let pairs = vec![pair];
    let mut backoff = INITIAL_BACKOFF;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        info!(url = %session_config.url, "Connecting to WebSocket");
        let session = match Session::connect(&session_config).await {
            Ok(session) => session,
            Err(e) => {
                error!("Connection failed: {e}");
                info!(backoff_secs = backoff.as_secs(), "Backing off before retry");
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
                continue;
            }
        };

        if let Err(e) = session.subscribe(&pairs, Subscription::book(depth)).await {
            warn!("Subscribe failed: {e}");
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
            continue;
        }

        // Reset backoff on successful connection
        backoff = INITIAL_BACKOFF;

        let (session, reason) = stream_book(session, &mut shutdown).await;

        match reason {
            DisconnectReason::Resync => {
                info!("Checksum mismatch, resubscribing for a fresh snapshot");
                close(session).await;
            }
            DisconnectReason::ConnectionLost(reason) => {
                info!(
                    %reason,
                    backoff_secs = backoff.as_secs(),
                    "Connection lost, backing off"
                );
                drop(session);
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
            DisconnectReason::Shutdown => {
                close(session).await;
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}

/// Maintains the book from session events until the session ends.
async fn stream_book<F>(mut session: Session, shutdown: &mut F) -> (Session, DisconnectReason)
where
    F: Future<Output = std::io::Result<()>> + Unpin,
{
    let mut book: Option<OrderBook> = None;

    let reason = loop {
        let event = tokio::select! {
            event = session.next_event() => event,
            _ = &mut *shutdown => break DisconnectReason::Shutdown,
        };

        match event {
            Some(SessionEvent::Message(Message::BookSnapshot(snapshot))) => {
                match OrderBook::from_snapshot(snapshot) {
                    Ok(snapshot_book) => {
                        info!(
                            pair = %snapshot_book.pair,
                            depth = ?snapshot_book.depth(),
                            "Received book snapshot"
                        );
                        snapshot_book.print_top(TOP_LEVELS);
                        book = Some(snapshot_book);
                    }
                    Err(e) => warn!("Rejected book snapshot: {e}"),
                }
            }
            Some(SessionEvent::Message(Message::BookUpdate(update))) => {
                let Some(book) = book.as_mut() else {
                    warn!(pair = %update.pair, "Book update before snapshot");
                    continue;
                };
                match book.apply_update_checked(&update.data) {
                    Ok(()) => book.print_top(TOP_LEVELS),
                    Err(e @ BookError::ChecksumMismatch { .. }) => {
                        warn!(pair = %book.pair, "{e}");
                        break DisconnectReason::Resync;
                    }
                    Err(e) => warn!(pair = %book.pair, "Rejected book update: {e}"),
                }
            }
            Some(SessionEvent::Message(Message::SubscriptionStatus(status))) => {
                info!(
                    channel = ?status.channel_name,
                    pair = ?status.pair,
                    status = %status.status,
                    "Subscription status"
                );
            }
            Some(SessionEvent::Message(Message::Error(err))) => {
                warn!(event = %err.event, "Exchange error: {}", err.error_message);
            }
            Some(SessionEvent::Message(message)) => debug!(kind = message.kind(), "Ignoring message"),
            Some(SessionEvent::Error(e)) => warn!("Session error: {e}"),
            Some(SessionEvent::UnsupportedFrame) => debug!("Ignoring binary frame"),
            Some(SessionEvent::Disconnected { reason }) => {
                break DisconnectReason::ConnectionLost(reason);
            }
            None => break DisconnectReason::ConnectionLost("event channel closed".to_string()),
        }
    };

    (session, reason)
}

async fn close(session: Session) {
    if let Err(e) = session.close().await {
        warn!("Failed to close session: {e}");
    }
}
