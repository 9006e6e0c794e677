//! Order book channel models.

use rust_decimal::Decimal;

use super::Timestamp;

/// A single price level in the order book.
///
/// A volume of exactly zero in an update deletes the level at `price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: Decimal,
    pub volume: Decimal,
    pub timestamp: Timestamp,
    /// Set when the exchange resends a level that fell back into scope
    /// (optional fourth element `"r"`).
    pub republish: bool,
}

impl PriceLevel {
    /// Creates a level that is not a republish.
    #[must_use]
    pub fn new(price: Decimal, volume: Decimal, timestamp: Timestamp) -> Self {
        Self {
            price,
            volume,
            timestamp,
            republish: false,
        }
    }

    /// Returns `true` if this entry deletes its price level.
    #[must_use]
    pub fn is_deletion(&self) -> bool {
        self.volume.is_zero()
    }
}

/// Full book sent right after subscribing (wire keys `as` and `bs`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSnapshotData {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
}

/// Incremental per-side changes (wire keys `a`, `b` and checksum `c`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookUpdateData {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
    /// CRC32 of the top ten levels of each side after applying this update.
    pub checksum: Option<u32>,
}
