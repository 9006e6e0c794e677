//! Local order book replica.
//!
//! [`OrderBook`] holds one [`BookSide`] per direction and is seeded from a
//! book snapshot, then mutated in place by book updates in delivery order.
//! Each side stays unique by price and fully sorted after every call:
//! asks ascending, bids descending.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::models::{BookSnapshot, BookUpdateData, PriceLevel, channel_suffix};

/// Number of levels per side covered by the exchange checksum.
const CHECKSUM_DEPTH: usize = 10;

/// Decimal places used when printing the book.
const DISPLAY_DECIMALS: u32 = 5;

/// Reasons a snapshot or update is rejected. A rejected call leaves the
/// book unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    #[error("snapshot level at {price} has zero volume")]
    ZeroVolume { price: Decimal },

    #[error("level at {price} has negative volume")]
    NegativeVolume { price: Decimal },

    #[error("snapshot contains price {price} more than once")]
    DuplicatePrice { price: Decimal },

    #[error("checksum mismatch: exchange sent {expected}, local book has {actual}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

/// Which side of the book a [`BookSide`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Ask,
    Bid,
}

impl Side {
    fn cmp_prices(self, a: &Decimal, b: &Decimal) -> Ordering {
        match self {
            Side::Ask => a.cmp(b),
            Side::Bid => b.cmp(a),
        }
    }
}

/// One side of the book: price levels unique by price, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSide {
    side: Side,
    levels: Vec<PriceLevel>,
}

impl BookSide {
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn levels(&self) -> &[PriceLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Best (first) level, if any.
    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.first()
    }

    /// Up to `n` best levels.
    pub fn top(&self, n: usize) -> &[PriceLevel] {
        &self.levels[..n.min(self.levels.len())]
    }

    /// Validates a full replacement list without touching the side.
    fn check_snapshot(levels: &[PriceLevel]) -> Result<(), BookError> {
        for (index, level) in levels.iter().enumerate() {
            if level.volume.is_zero() {
                return Err(BookError::ZeroVolume { price: level.price });
            }
            if level.volume.is_sign_negative() {
                return Err(BookError::NegativeVolume { price: level.price });
            }
            if levels[..index].iter().any(|l| l.price == level.price) {
                return Err(BookError::DuplicatePrice { price: level.price });
            }
        }
        Ok(())
    }

    fn check_update(levels: &[PriceLevel]) -> Result<(), BookError> {
        match levels.iter().find(|l| l.volume.is_sign_negative() && !l.volume.is_zero()) {
            Some(level) => Err(BookError::NegativeVolume { price: level.price }),
            None => Ok(()),
        }
    }

    fn replace(&mut self, levels: Vec<PriceLevel>) {
        self.levels = levels;
        self.sort();
    }

    /// Applies update entries in order, then re-sorts the whole side.
    ///
    /// Zero volume deletes the level at that price; any other volume
    /// replaces the existing level's volume and timestamp or inserts a new
    /// level. Deleting a price that is not present is ignored.
    fn apply(&mut self, updates: &[PriceLevel]) {
        for update in updates {
            let found = self.levels.iter().position(|l| l.price == update.price);

            match (found, update.is_deletion()) {
                (Some(index), true) => {
                    // Order is restored by the sort below.
                    self.levels.swap_remove(index);
                }
                (Some(index), false) => {
                    let level = &mut self.levels[index];
                    level.volume = update.volume;
                    level.timestamp = update.timestamp;
                    level.republish = update.republish;
                }
                (None, true) => {
                    warn!(
                        side = ?self.side,
                        price = %update.price,
                        "Attempted to remove non-existent level"
                    );
                }
                (None, false) => self.levels.push(update.clone()),
            }
        }
        self.sort();
    }

    fn sort(&mut self) {
        let side = self.side;
        self.levels
            .sort_unstable_by(|a, b| side.cmp_prices(&a.price, &b.price));
    }

    fn truncate(&mut self, depth: Option<usize>) {
        if let Some(depth) = depth {
            self.levels.truncate(depth);
        }
    }
}

/// Order book replica for one subscribed pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    pub channel_id: i64,
    pub pair: String,
    /// Subscribed depth. When set, levels pushed beyond it are dropped.
    depth: Option<usize>,
    asks: BookSide,
    bids: BookSide,
}

impl OrderBook {
    /// Creates an empty book with no depth limit.
    #[must_use]
    pub fn new(channel_id: i64, pair: &str) -> Self {
        Self {
            channel_id,
            pair: pair.to_string(),
            depth: None,
            asks: BookSide::new(Side::Ask),
            bids: BookSide::new(Side::Bid),
        }
    }

    /// Limits each side to `depth` levels.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self.asks.truncate(self.depth);
        self.bids.truncate(self.depth);
        self
    }

    /// Builds a book from a decoded snapshot frame, taking the depth from
    /// the channel name (`"book-25"` → 25).
    ///
    /// # Errors
    ///
    /// Returns a [`BookError`] if the snapshot contains a zero or negative
    /// volume or a repeated price.
    pub fn from_snapshot(snapshot: BookSnapshot) -> Result<Self, BookError> {
        let mut book = Self::new(snapshot.channel_id, &snapshot.pair);
        book.depth = channel_suffix(&snapshot.channel_name).map(|d| d as usize);
        book.apply_snapshot(snapshot.data.asks, snapshot.data.bids)?;
        Ok(book)
    }

    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.best()
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.best()
    }

    /// Best ask minus best bid.
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// Replaces both sides wholesale.
    ///
    /// # Errors
    ///
    /// Returns a [`BookError`] and leaves the book untouched if either
    /// side contains a zero or negative volume or a repeated price.
    pub fn apply_snapshot(
        &mut self,
        asks: Vec<PriceLevel>,
        bids: Vec<PriceLevel>,
    ) -> Result<(), BookError> {
        BookSide::check_snapshot(&asks)?;
        BookSide::check_snapshot(&bids)?;

        self.asks.replace(asks);
        self.bids.replace(bids);
        self.asks.truncate(self.depth);
        self.bids.truncate(self.depth);
        Ok(())
    }

    /// Applies an incremental update to both sides.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::NegativeVolume`] and leaves the book untouched
    /// if any entry carries a negative volume.
    pub fn apply_update(&mut self, update: &BookUpdateData) -> Result<(), BookError> {
        BookSide::check_update(&update.asks)?;
        BookSide::check_update(&update.bids)?;

        self.asks.apply(&update.asks);
        self.bids.apply(&update.bids);
        self.asks.truncate(self.depth);
        self.bids.truncate(self.depth);
        Ok(())
    }

    /// Applies an update and, if it carries a checksum, verifies the
    /// resulting book against it.
    ///
    /// # Errors
    ///
    /// See [`apply_update`](Self::apply_update) and
    /// [`verify_checksum`](Self::verify_checksum). A checksum mismatch is
    /// reported after the update has been applied.
    pub fn apply_update_checked(&mut self, update: &BookUpdateData) -> Result<(), BookError> {
        self.apply_update(update)?;
        match update.checksum {
            Some(expected) => self.verify_checksum(expected),
            None => Ok(()),
        }
    }

    /// Read-only view of up to `n` levels per side.
    pub fn top(&self, n: usize) -> TopOfBook<'_> {
        TopOfBook {
            asks: self.asks.top(n),
            bids: self.bids.top(n),
        }
    }

    /// Prints up to `n` levels per side to stdout.
    pub fn print_top(&self, n: usize) {
        print!("{}", self.top(n));
    }

    /// CRC32 over the ten best asks then the ten best bids.
    ///
    /// Each level contributes its price then its volume as the wire
    /// decimal string with the `.` removed and leading zeros stripped.
    pub fn checksum(&self) -> u32 {
        let mut input = String::new();
        for level in self
            .asks
            .top(CHECKSUM_DEPTH)
            .iter()
            .chain(self.bids.top(CHECKSUM_DEPTH))
        {
            push_checksum_digits(&mut input, &level.price);
            push_checksum_digits(&mut input, &level.volume);
        }
        crc32fast::hash(input.as_bytes())
    }

    /// # Errors
    ///
    /// Returns [`BookError::ChecksumMismatch`] if the local checksum differs.
    pub fn verify_checksum(&self, expected: u32) -> Result<(), BookError> {
        let actual = self.checksum();
        if actual == expected {
            Ok(())
        } else {
            Err(BookError::ChecksumMismatch { expected, actual })
        }
    }
}

fn push_checksum_digits(input: &mut String, value: &Decimal) {
    let digits: String = value.to_string().chars().filter(|c| *c != '.').collect();
    input.push_str(digits.trim_start_matches('0'));
}

/// Borrowed projection of the best levels on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopOfBook<'a> {
    pub asks: &'a [PriceLevel],
    pub bids: &'a [PriceLevel],
}

impl fmt::Display for TopOfBook<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Asks:")?;
        for level in self.asks {
            write_level(f, level)?;
        }
        writeln!(f, "Bids:")?;
        for level in self.bids {
            write_level(f, level)?;
        }
        Ok(())
    }
}

fn write_level(f: &mut fmt::Formatter<'_>, level: &PriceLevel) -> fmt::Result {
    writeln!(
        f,
        "{:>11} {:>11}",
        format_decimal(level.price, DISPLAY_DECIMALS),
        format_decimal(level.volume, DISPLAY_DECIMALS)
    )
}

/// Renders `value` with exactly `decimals` fractional digits, rounding
/// half away from zero.
pub fn format_decimal(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimals as usize, rounded)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Timestamp;

    fn level(price: Decimal, volume: Decimal) -> PriceLevel {
        PriceLevel::new(price, volume, Timestamp::default())
    }

    #[test]
    fn format_decimal_pads_and_rounds() {
        assert_eq!(format_decimal(dec!(3.1415), 0), "3");
        assert_eq!(format_decimal(dec!(3.1415), 1), "3.1");
        assert_eq!(format_decimal(dec!(3.1415), 2), "3.14");
        assert_eq!(format_decimal(dec!(3.1415), 3), "3.142");
        assert_eq!(format_decimal(dec!(2), 3), "2.000");
    }

    #[test]
    fn swap_remove_then_sort_keeps_order() {
        let mut side = BookSide::new(Side::Bid);
        side.replace(vec![
            level(dec!(1), dec!(1)),
            level(dec!(2), dec!(1)),
            level(dec!(3), dec!(1)),
            level(dec!(4), dec!(1)),
        ]);
        side.apply(&[level(dec!(4), dec!(0))]);

        let prices: Vec<_> = side.levels().iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![dec!(3), dec!(2), dec!(1)]);
    }

    #[test]
    fn snapshot_rejects_duplicate_prices_atomically() {
        let mut book = OrderBook::new(1, "XBT/USD");
        book.apply_snapshot(vec![level(dec!(5), dec!(1))], vec![level(dec!(4), dec!(1))])
            .unwrap();

        let err = book
            .apply_snapshot(
                vec![level(dec!(6), dec!(1))],
                vec![level(dec!(3), dec!(1)), level(dec!(3), dec!(2))],
            )
            .unwrap_err();

        assert_eq!(err, BookError::DuplicatePrice { price: dec!(3) });
        assert_eq!(book.best_ask().unwrap().price, dec!(5));
        assert_eq!(book.best_bid().unwrap().price, dec!(4));
    }

    #[test]
    fn checksum_digits_strip_point_and_leading_zeros() {
        let mut input = String::new();
        push_checksum_digits(&mut input, &"0.05005".parse().unwrap());
        push_checksum_digits(&mut input, &"0.00000500".parse().unwrap());
        push_checksum_digits(&mut input, &"5541.30000".parse().unwrap());
        assert_eq!(input, "5005500554130000");
    }
}
