//! Trade channel models.

use rust_decimal::Decimal;

use super::Timestamp;

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeData {
    pub price: Decimal,
    pub volume: Decimal,
    pub time: Timestamp,
    /// Trade direction: `"b"` (buy) or `"s"` (sell).
    pub side: String,
    /// Order type that triggered this trade: `"m"` (market) or `"l"` (limit).
    pub order_type: String,
    pub misc: String,
}
