use rust_decimal::Decimal;

use super::Timestamp;

/// One fill of the account's own orders (private `ownTrades` channel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnTrade {
    pub trade_id: String,
    pub order_txid: String,
    pub pos_txid: String,
    pub pair: String,
    pub time: Timestamp,
    /// `"buy"` or `"sell"`.
    pub side: String,
    pub order_type: String,
    pub price: Decimal,
    pub cost: Decimal,
    pub fee: Decimal,
    pub volume: Decimal,
    pub margin: Decimal,
}
