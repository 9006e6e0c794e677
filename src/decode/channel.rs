//! Array-framed channel messages.
//!
//! Layout is `[channel_id, payload, channel_name, pair]`. Book updates
//! that touch both sides may arrive as five elements with the ask and bid
//! halves in separate objects at offsets 1 and 2; those are merged into
//! one payload before dispatch.

use serde_json::{Map, Value};

use super::error::{DecodeError, ResultExt};
use super::fields::{Fields, as_array, as_object, as_str, number_as_i64};
use crate::models::{
    BookSnapshotData, BookUpdateData, ChannelKind, ChannelMessage, Message, OhlcData, PriceLevel,
    SpreadData, TickerAskBid, TickerClose, TickerData, TickerStats, TickerTrades, TradeData,
    channel_prefix,
};

/// Payload key whose presence marks a full book snapshot.
const SNAPSHOT_ASKS: &str = "as";
const SNAPSHOT_BIDS: &str = "bs";
const UPDATE_ASKS: &str = "a";
const UPDATE_BIDS: &str = "b";
const UPDATE_CHECKSUM: &str = "c";

/// Envelope fields with the payload still undecoded.
struct Envelope {
    channel_id: i64,
    payload: Value,
    channel_name: String,
    pair: String,
}

impl Envelope {
    fn wrap<T>(self, data: T) -> ChannelMessage<T> {
        ChannelMessage {
            channel_id: self.channel_id,
            channel_name: self.channel_name,
            pair: self.pair,
            data,
        }
    }
}

/// Decodes an array frame.
pub(crate) fn decode_channel(value: Value) -> Result<Message, DecodeError> {
    let envelope = split_envelope(value)?;
    let prefix = channel_prefix(&envelope.channel_name);

    let Some(kind) = ChannelKind::from_prefix(prefix) else {
        return Err(DecodeError::UnknownChannel(prefix.to_string()));
    };

    match kind {
        ChannelKind::Ticker => {
            let data = parse_ticker(&envelope.payload).context(|| "parsing ticker data".into())?;
            Ok(Message::Ticker(envelope.wrap(data)))
        }
        ChannelKind::Ohlc => {
            let data = parse_ohlc(&envelope.payload).context(|| "parsing ohlc data".into())?;
            Ok(Message::Ohlc(envelope.wrap(data)))
        }
        ChannelKind::Trade => {
            let data = parse_trades(&envelope.payload).context(|| "parsing trade data".into())?;
            Ok(Message::Trade(envelope.wrap(data)))
        }
        ChannelKind::Spread => {
            let data = parse_spread(&envelope.payload).context(|| "parsing spread data".into())?;
            Ok(Message::Spread(envelope.wrap(data)))
        }
        ChannelKind::Book => decode_book(envelope),
    }
}

fn split_envelope(value: Value) -> Result<Envelope, DecodeError> {
    let Value::Array(mut items) = value else {
        return Err(DecodeError::expected("JSON object or JSON array"));
    };

    if items.len() == 5 {
        let second = items.remove(2);
        match (&mut items[1], second) {
            (Value::Object(first), Value::Object(second)) => merge(first, second),
            _ => return Err(DecodeError::expected("JSON object at offsets 1 and 2")),
        }
    }

    if items.len() != 4 {
        return Err(DecodeError::ArrayLength {
            expected: "4".to_string(),
            actual: items.len(),
        });
    }

    let channel_id = number_as_i64(&items[0]).at(0)?;
    let channel_name = as_str(&items[2]).at(2)?.to_string();
    let pair = as_str(&items[3]).at(3)?.to_string();
    let payload = items.swap_remove(1);

    Ok(Envelope {
        channel_id,
        payload,
        channel_name,
        pair,
    })
}

/// Union of keys; on collision the later object wins.
fn merge(into: &mut Map<String, Value>, from: Map<String, Value>) {
    for (key, value) in from {
        into.insert(key, value);
    }
}

fn field<'a>(object: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, DecodeError> {
    object.get(key).ok_or(DecodeError::MissingField(key))
}

fn parse_ticker(payload: &Value) -> Result<TickerData, DecodeError> {
    let object = as_object(payload)?;

    let ask_bid = |key: &'static str| -> Result<TickerAskBid, DecodeError> {
        let fields = Fields::exact(field(object, key)?, 3)?;
        Ok(TickerAskBid {
            price: fields.decimal(0)?,
            whole_lot_volume: fields.int(1)?,
            lot_volume: fields.decimal(2)?,
        })
    };
    let stats = |key: &'static str| -> Result<TickerStats, DecodeError> {
        let fields = Fields::exact(field(object, key)?, 2)?;
        Ok(TickerStats {
            today: fields.decimal(0)?,
            last_24_hours: fields.decimal(1)?,
        })
    };
    let close = || -> Result<TickerClose, DecodeError> {
        let fields = Fields::exact(field(object, "c")?, 2)?;
        Ok(TickerClose {
            price: fields.decimal(0)?,
            lot_volume: fields.decimal(1)?,
        })
    };
    let trades = || -> Result<TickerTrades, DecodeError> {
        let fields = Fields::exact(field(object, "t")?, 2)?;
        Ok(TickerTrades {
            today: fields.int(0)?,
            last_24_hours: fields.int(1)?,
        })
    };

    Ok(TickerData {
        ask: ask_bid("a").in_field("a")?,
        bid: ask_bid("b").in_field("b")?,
        close: close().in_field("c")?,
        volume: stats("v").in_field("v")?,
        vwap: stats("p").in_field("p")?,
        trades: trades().in_field("t")?,
        low: stats("l").in_field("l")?,
        high: stats("h").in_field("h")?,
        open: stats("o").in_field("o")?,
    })
}

fn parse_ohlc(payload: &Value) -> Result<OhlcData, DecodeError> {
    let fields = Fields::exact(payload, 9)?;
    Ok(OhlcData {
        time: fields.timestamp(0)?,
        end_time: fields.timestamp(1)?,
        open: fields.decimal(2)?,
        high: fields.decimal(3)?,
        low: fields.decimal(4)?,
        close: fields.decimal(5)?,
        vwap: fields.decimal(6)?,
        volume: fields.decimal(7)?,
        count: fields.int(8)?,
    })
}

fn parse_trades(payload: &Value) -> Result<Vec<TradeData>, DecodeError> {
    as_array(payload)?
        .iter()
        .enumerate()
        .map(|(index, trade)| parse_trade(trade).at(index))
        .collect()
}

fn parse_trade(value: &Value) -> Result<TradeData, DecodeError> {
    let fields = Fields::exact(value, 6)?;
    Ok(TradeData {
        price: fields.decimal(0)?,
        volume: fields.decimal(1)?,
        time: fields.timestamp(2)?,
        side: fields.string(3)?.to_string(),
        order_type: fields.string(4)?.to_string(),
        misc: fields.string(5)?.to_string(),
    })
}

fn parse_spread(payload: &Value) -> Result<SpreadData, DecodeError> {
    let fields = Fields::exact(payload, 5)?;
    Ok(SpreadData {
        ask: fields.decimal(0)?,
        bid: fields.decimal(1)?,
        time: fields.timestamp(2)?,
        bid_volume: fields.decimal(3)?,
        ask_volume: fields.decimal(4)?,
    })
}

fn decode_book(envelope: Envelope) -> Result<Message, DecodeError> {
    let object = as_object(&envelope.payload).context(|| "parsing book data".into())?;

    if object.contains_key(SNAPSHOT_ASKS) {
        let data = parse_snapshot(object).context(|| "parsing book data".into())?;
        Ok(Message::BookSnapshot(envelope.wrap(data)))
    } else {
        let data = parse_update(object).context(|| "parsing book update data".into())?;
        Ok(Message::BookUpdate(envelope.wrap(data)))
    }
}

fn parse_snapshot(object: &Map<String, Value>) -> Result<BookSnapshotData, DecodeError> {
    Ok(BookSnapshotData {
        asks: parse_levels(object.get(SNAPSHOT_ASKS)).in_field(SNAPSHOT_ASKS)?,
        bids: parse_levels(object.get(SNAPSHOT_BIDS)).in_field(SNAPSHOT_BIDS)?,
    })
}

fn parse_update(object: &Map<String, Value>) -> Result<BookUpdateData, DecodeError> {
    let checksum = object
        .get(UPDATE_CHECKSUM)
        .map(parse_checksum)
        .transpose()
        .in_field(UPDATE_CHECKSUM)?;

    Ok(BookUpdateData {
        asks: parse_levels(object.get(UPDATE_ASKS)).in_field(UPDATE_ASKS)?,
        bids: parse_levels(object.get(UPDATE_BIDS)).in_field(UPDATE_BIDS)?,
        checksum,
    })
}

/// An absent side decodes as empty.
fn parse_levels(value: Option<&Value>) -> Result<Vec<PriceLevel>, DecodeError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };

    as_array(value)?
        .iter()
        .enumerate()
        .map(|(index, level)| parse_level(level).at(index))
        .collect()
}

fn parse_level(value: &Value) -> Result<PriceLevel, DecodeError> {
    let fields = Fields::between(value, 3, 4)?;
    let republish = if fields.len() == 4 {
        fields.string(3)? == "r"
    } else {
        false
    };

    Ok(PriceLevel {
        price: fields.decimal(0)?,
        volume: fields.decimal(1)?,
        timestamp: fields.timestamp(2)?,
        republish,
    })
}

fn parse_checksum(value: &Value) -> Result<u32, DecodeError> {
    let s = as_str(value)?;
    s.parse()
        .map_err(|_| DecodeError::expected(format!("CRC32 checksum, got `{s}`")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn merge_is_last_write_wins() {
        let mut first = json!({ "a": 1, "c": "1" }).as_object().unwrap().clone();
        let second = json!({ "b": 2, "c": "2" }).as_object().unwrap().clone();
        merge(&mut first, second);

        assert_eq!(first["a"], 1);
        assert_eq!(first["b"], 2);
        assert_eq!(first["c"], "2");
    }

    #[test]
    fn five_elements_require_two_objects() {
        let err = split_envelope(json!([1, {"a": []}, [], "book-10", "XBT/USD"]))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "expected JSON object at offsets 1 and 2");
    }

    #[test]
    fn envelope_checks_positions() {
        let err = split_envelope(json!(["1", {}, "ticker", "XBT/USD"])).err().unwrap();
        assert_eq!(err.to_string(), "at offset 0: expected JSON number");

        let err = split_envelope(json!([1, {}, 5, "XBT/USD"])).err().unwrap();
        assert_eq!(err.to_string(), "at offset 2: expected JSON string");

        let err = split_envelope(json!([1, {}, "ticker"])).err().unwrap();
        assert_eq!(err.to_string(), "expected JSON array with length 4, got 3");
    }

    #[test]
    fn level_accepts_republish_flag() {
        let level = parse_level(&json!(["1.0", "2.0", "3.5", "r"])).unwrap();
        assert!(level.republish);

        let level = parse_level(&json!(["1.0", "2.0", "3.5"])).unwrap();
        assert!(!level.republish);

        assert!(parse_level(&json!(["1.0", "2.0"])).is_err());
    }

    #[test]
    fn checksum_must_be_numeric_string() {
        assert_eq!(parse_checksum(&json!("974942666")).unwrap(), 974942666);
        assert!(parse_checksum(&json!(974942666)).is_err());
        assert!(parse_checksum(&json!("abc")).is_err());
    }
}
