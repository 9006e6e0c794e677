//! Ticker channel models.
//!
//! The ticker payload is an object keyed by single letters whose values
//! are short positional arrays; see the decoder for the per-offset rules.

use rust_decimal::Decimal;

/// Best ask or bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerAskBid {
    pub price: Decimal,
    pub whole_lot_volume: i64,
    pub lot_volume: Decimal,
}

/// Last trade closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerClose {
    pub price: Decimal,
    pub lot_volume: Decimal,
}

/// Number of trades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerTrades {
    pub today: i64,
    pub last_24_hours: i64,
}

/// A decimal statistic reported for today and the last 24 hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerStats {
    pub today: Decimal,
    pub last_24_hours: Decimal,
}

/// Payload of a `ticker` frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerData {
    /// Wire key `a`.
    pub ask: TickerAskBid,
    /// Wire key `b`.
    pub bid: TickerAskBid,
    /// Wire key `c`.
    pub close: TickerClose,
    /// Wire key `v`.
    pub volume: TickerStats,
    /// Volume weighted average price (wire key `p`).
    pub vwap: TickerStats,
    /// Wire key `t`.
    pub trades: TickerTrades,
    /// Wire key `l`.
    pub low: TickerStats,
    /// Wire key `h`.
    pub high: TickerStats,
    /// Wire key `o`.
    pub open: TickerStats,
}
