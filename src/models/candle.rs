//! OHLC candlestick channel models.

use rust_decimal::Decimal;

use super::Timestamp;

/// A single OHLC candlestick bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OhlcData {
    /// Time of the last update within the interval.
    pub time: Timestamp,
    /// End of this candle's time window.
    pub end_time: Timestamp,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Volume-weighted average price for this candle.
    pub vwap: Decimal,
    pub volume: Decimal,
    pub count: i64,
}
