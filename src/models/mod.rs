//! Typed models for Kraken WebSocket messages.
//!
//! Contains the [`Message`] sum type produced by the decoder, the shared
//! [`ChannelMessage`] and [`PrivateMessage`] envelopes of array-framed
//! channel data, the per-channel payload records, and outbound request
//! types.

pub mod book;
pub mod candle;
pub mod event;
pub mod orders;
pub mod own_trades;
pub mod requests;
pub mod spread;
pub mod ticker;
pub mod timestamp;
pub mod trade;
pub mod trading;

use std::fmt;

use serde::{Serialize, Serializer};
use zeroize::Zeroizing;

pub use book::{BookSnapshotData, BookUpdateData, PriceLevel};
pub use candle::OhlcData;
pub use event::{
    AddOrderStatus, CancelAllStatus, CancelOrderStatus, ErrorMessage, Pong, SubscriptionDetails,
    SubscriptionStatus, SystemStatus,
};
pub use orders::{OpenOrder, OpenOrderDescription, OpenOrders};
pub use own_trades::OwnTrade;
pub use requests::{Ping, Subscribe, Subscription, Unsubscribe};
pub use spread::SpreadData;
pub use ticker::{TickerAskBid, TickerClose, TickerData, TickerStats, TickerTrades};
pub use timestamp::Timestamp;
pub use trade::TradeData;
pub use trading::{AddOrder, CancelAll, CancelOrder, OrderSide, OrderType};

/// Public data channels, identified on the wire by the prefix of the
/// channel name (`"book-10"`, `"ohlc-5"`, `"ticker"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Ticker,
    /// OHLC candlestick data (wire name: `"ohlc"`).
    Ohlc,
    Trade,
    Spread,
    Book,
}

impl ChannelKind {
    /// Returns the wire-format base name expected by the Kraken API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Ticker => "ticker",
            ChannelKind::Ohlc => "ohlc",
            ChannelKind::Trade => "trade",
            ChannelKind::Spread => "spread",
            ChannelKind::Book => "book",
        }
    }

    /// Parses a base name such as `"book"`.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "ticker" => Some(ChannelKind::Ticker),
            "ohlc" => Some(ChannelKind::Ohlc),
            "trade" => Some(ChannelKind::Trade),
            "spread" => Some(ChannelKind::Spread),
            "book" => Some(ChannelKind::Book),
            _ => None,
        }
    }
}

/// Returns the part of a channel name before the first `-`.
pub fn channel_prefix(channel_name: &str) -> &str {
    channel_name
        .split_once('-')
        .map_or(channel_name, |(prefix, _)| prefix)
}

/// Returns the numeric suffix of a channel name (`"book-25"` → 25).
pub fn channel_suffix(channel_name: &str) -> Option<u32> {
    channel_name
        .split_once('-')
        .and_then(|(_, suffix)| suffix.parse().ok())
}

/// Envelope shared by every array-framed channel message:
/// `[channel_id, payload, channel_name, pair]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMessage<T> {
    pub channel_id: i64,
    /// Full channel name including any suffix, e.g. `"book-10"`.
    pub channel_name: String,
    pub pair: String,
    pub data: T,
}

pub type Ticker = ChannelMessage<TickerData>;
pub type Ohlc = ChannelMessage<OhlcData>;
pub type Trade = ChannelMessage<Vec<TradeData>>;
pub type Spread = ChannelMessage<SpreadData>;
pub type BookSnapshot = ChannelMessage<BookSnapshotData>;
pub type BookUpdate = ChannelMessage<BookUpdateData>;

/// Private channels of the authenticated stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivateChannel {
    OpenOrders,
    OwnTrades,
}

impl PrivateChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivateChannel::OpenOrders => "openOrders",
            PrivateChannel::OwnTrades => "ownTrades",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "openOrders" => Some(PrivateChannel::OpenOrders),
            "ownTrades" => Some(PrivateChannel::OwnTrades),
            _ => None,
        }
    }
}

/// Envelope of private channel frames:
/// `[payload, channel_name, {"sequence": n}]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateMessage<T> {
    pub channel_name: String,
    /// Per-channel counter; a gap means frames were lost.
    pub sequence: u64,
    pub data: T,
}

pub type OpenOrdersUpdate = PrivateMessage<OpenOrders>;
pub type OwnTrades = PrivateMessage<Vec<OwnTrade>>;

/// One decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Heartbeat,
    Pong(Pong),
    SubscriptionStatus(SubscriptionStatus),
    SystemStatus(SystemStatus),
    /// Any object carrying `"status": "error"`, whatever its `event`.
    Error(ErrorMessage),
    Ticker(Ticker),
    Ohlc(Ohlc),
    Trade(Trade),
    Spread(Spread),
    BookSnapshot(BookSnapshot),
    BookUpdate(BookUpdate),
    OpenOrders(OpenOrdersUpdate),
    OwnTrades(OwnTrades),
    AddOrderStatus(AddOrderStatus),
    CancelOrderStatus(CancelOrderStatus),
    CancelAllStatus(CancelAllStatus),
}

impl Message {
    /// Short name of the variant, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Heartbeat => "heartbeat",
            Message::Pong(_) => "pong",
            Message::SubscriptionStatus(_) => "subscriptionStatus",
            Message::SystemStatus(_) => "systemStatus",
            Message::Error(_) => "error",
            Message::Ticker(_) => "ticker",
            Message::Ohlc(_) => "ohlc",
            Message::Trade(_) => "trade",
            Message::Spread(_) => "spread",
            Message::BookSnapshot(_) => "bookSnapshot",
            Message::BookUpdate(_) => "bookUpdate",
            Message::OpenOrders(_) => "openOrders",
            Message::OwnTrades(_) => "ownTrades",
            Message::AddOrderStatus(_) => "addOrderStatus",
            Message::CancelOrderStatus(_) => "cancelOrderStatus",
            Message::CancelAllStatus(_) => "cancelAllStatus",
        }
    }
}

/// An authentication token that serializes as its plain value but never
/// shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedToken(Zeroizing<String>);

impl RedactedToken {
    pub fn new(token: &str) -> Self {
        Self(Zeroizing::new(token.to_string()))
    }

    /// Returns the raw token.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RedactedToken([REDACTED])")
    }
}

impl Serialize for RedactedToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_ignores_suffix() {
        assert_eq!(channel_prefix("book-10"), "book");
        assert_eq!(channel_prefix("ohlc-5"), "ohlc");
        assert_eq!(channel_prefix("ticker"), "ticker");
        assert_eq!(channel_prefix(""), "");
    }

    #[test]
    fn suffix_parses_depth() {
        assert_eq!(channel_suffix("book-25"), Some(25));
        assert_eq!(channel_suffix("book"), None);
        assert_eq!(channel_suffix("book-x"), None);
    }

    #[test]
    fn channel_kind_round_trips_wire_names() {
        for kind in [
            ChannelKind::Ticker,
            ChannelKind::Ohlc,
            ChannelKind::Trade,
            ChannelKind::Spread,
            ChannelKind::Book,
        ] {
            assert_eq!(ChannelKind::from_prefix(kind.as_str()), Some(kind));
        }
        assert_eq!(ChannelKind::from_prefix("ownTrades"), None);
    }

    #[test]
    fn private_channel_names_are_exact() {
        for channel in [PrivateChannel::OpenOrders, PrivateChannel::OwnTrades] {
            assert_eq!(PrivateChannel::from_name(channel.as_str()), Some(channel));
        }
        assert_eq!(PrivateChannel::from_name("openorders"), None);
        assert_eq!(PrivateChannel::from_name("ticker"), None);
    }

    #[test]
    fn redacted_token_hides_value_in_debug() {
        let token = RedactedToken::new("secret-token");
        assert!(!format!("{token:?}").contains("secret-token"));
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"secret-token\"");
    }
}
