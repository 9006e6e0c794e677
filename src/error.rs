//! Crate-level error types.
//!
//! [`FeedError`] unifies every error source (configuration, WebSocket,
//! HTTP, JSON, frame decoding, order book consistency) behind a single
//! enum so callers can match on the variant they care about while still
//! using the `?` operator for easy propagation.

use crate::decode::DecodeError;
use crate::orderbook::BookError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Environment configuration is missing or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The REST request could not be sent or returned a non-success status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The REST API answered with an error list or an unusable body.
    #[error("api error: {0}")]
    Api(String),

    /// API credentials could not be turned into a request signature.
    #[error("authentication error: {0}")]
    Auth(String),

    /// An inbound frame could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A book snapshot or update was rejected.
    #[error("order book error: {0}")]
    Book(#[from] BookError),

    /// The periodic ping could not be sent.
    #[error("keep alive failed: {0}")]
    KeepAlive(String),
}
