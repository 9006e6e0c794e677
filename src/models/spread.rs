use rust_decimal::Decimal;

use super::Timestamp;

/// Best ask and bid with their volumes. The wire order is
/// `[ask, bid, time, bid_volume, ask_volume]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadData {
    pub ask: Decimal,
    pub bid: Decimal,
    pub time: Timestamp,
    pub bid_volume: Decimal,
    pub ask_volume: Decimal,
}
