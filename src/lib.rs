//! Kraken WebSocket client library.
//!
//! Decodes the mixed object/array wire protocol of Kraken's public and
//! private streams into typed [`Message`] values, maintains a local
//! [`OrderBook`] replica from snapshot and update frames, and provides an
//! async [`websocket::Session`] that delivers decoded messages and errors
//! in arrival order.

pub mod auth;
pub mod config;
pub mod decode;
pub mod error;
pub mod models;
pub mod orderbook;
pub mod websocket;

pub use decode::{DecodeError, decode};
pub use error::{FeedError, Result};
pub use models::Message;
pub use orderbook::OrderBook;
