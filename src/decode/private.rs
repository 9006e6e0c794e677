//! Private channel frames of the authenticated stream.
//!
//! Layout is `[payload, channel_name, {"sequence": n}]`, where the
//! payload is an array of objects that each map an order or trade id to
//! its record. `openOrders` updates only carry the fields that changed,
//! so every order field is optional; `ownTrades` records are complete.

use std::collections::HashMap;

use serde_json::Value;

use super::error::{DecodeError, ResultExt};
use super::fields::{
    Record, as_array, as_object, as_str, as_string, number_as_i64, number_as_u64,
    string_as_decimal, string_as_timestamp,
};
use crate::models::{
    Message, OpenOrder, OpenOrderDescription, OpenOrders, OwnTrade, PrivateChannel,
    PrivateMessage,
};

/// Number of elements in a private channel frame.
pub(crate) const FRAME_LEN: usize = 3;

/// Decodes the elements of a three-element array frame.
pub(crate) fn decode_private(items: &[Value]) -> Result<Message, DecodeError> {
    if items.len() != FRAME_LEN {
        return Err(DecodeError::ArrayLength {
            expected: FRAME_LEN.to_string(),
            actual: items.len(),
        });
    }

    let channel_name = as_str(&items[1]).at(1)?;
    let Some(channel) = PrivateChannel::from_name(channel_name) else {
        return Err(DecodeError::UnknownChannel(channel_name.to_string()));
    };
    let sequence = Record::new(&items[2])
        .and_then(|record| record.required("sequence", number_as_u64))
        .at(2)?;

    match channel {
        PrivateChannel::OpenOrders => {
            let data = parse_open_orders(&items[0])
                .at(0)
                .context(|| "parsing openOrders data".into())?;
            Ok(Message::OpenOrders(PrivateMessage {
                channel_name: channel_name.to_string(),
                sequence,
                data,
            }))
        }
        PrivateChannel::OwnTrades => {
            let data = parse_own_trades(&items[0])
                .at(0)
                .context(|| "parsing ownTrades data".into())?;
            Ok(Message::OwnTrades(PrivateMessage {
                channel_name: channel_name.to_string(),
                sequence,
                data,
            }))
        }
    }
}

/// Flattens the payload into `(id, record)` pairs in wire order.
fn entries(payload: &Value) -> Result<Vec<(&String, &Value)>, DecodeError> {
    let mut entries = Vec::new();
    for (index, entry) in as_array(payload)?.iter().enumerate() {
        entries.extend(as_object(entry).at(index)?);
    }
    Ok(entries)
}

fn parse_open_orders(payload: &Value) -> Result<OpenOrders, DecodeError> {
    let mut orders = HashMap::new();
    for (id, record) in entries(payload)? {
        let order = parse_open_order(record).context(|| format!("order {id}"))?;
        orders.insert(id.clone(), order);
    }
    Ok(OpenOrders { orders })
}

fn parse_open_order(value: &Value) -> Result<OpenOrder, DecodeError> {
    let record = Record::new(value)?;
    Ok(OpenOrder {
        ref_id: record.optional("refid", as_string)?,
        user_ref: record.optional("userref", number_as_i64)?,
        status: record.optional("status", as_string)?,
        open_time: record.optional("opentm", string_as_timestamp)?,
        start_time: record.optional("starttm", string_as_timestamp)?,
        expire_time: record.optional("expiretm", string_as_timestamp)?,
        description: record.optional("descr", parse_description)?,
        volume: record.optional("vol", string_as_decimal)?,
        volume_executed: record.optional("vol_exec", string_as_decimal)?,
        cost: record.optional("cost", string_as_decimal)?,
        fee: record.optional("fee", string_as_decimal)?,
        avg_price: record.optional("avg_price", string_as_decimal)?,
        limit_price: record.optional("limitprice", string_as_decimal)?,
        stop_price: record.optional("stopprice", string_as_decimal)?,
        misc: record.optional("misc", as_string)?,
        oflags: record.optional("oflags", as_string)?,
        cancel_reason: record.optional("cancel_reason", as_string)?,
    })
}

fn parse_description(value: &Value) -> Result<OpenOrderDescription, DecodeError> {
    let record = Record::new(value)?;
    Ok(OpenOrderDescription {
        pair: record.optional("pair", as_string)?,
        side: record.optional("type", as_string)?,
        order_type: record.optional("ordertype", as_string)?,
        price: record.optional("price", string_as_decimal)?,
        price2: record.optional("price2", string_as_decimal)?,
        leverage: record.optional("leverage", as_string)?,
        order: record.optional("order", as_string)?,
        close: record.optional("close", as_string)?,
    })
}

fn parse_own_trades(payload: &Value) -> Result<Vec<OwnTrade>, DecodeError> {
    entries(payload)?
        .into_iter()
        .map(|(id, record)| parse_own_trade(id, record).context(|| format!("trade {id}")))
        .collect()
}

fn parse_own_trade(id: &str, value: &Value) -> Result<OwnTrade, DecodeError> {
    let record = Record::new(value)?;
    Ok(OwnTrade {
        trade_id: id.to_string(),
        order_txid: record.required("ordertxid", as_string)?,
        pos_txid: record.optional("postxid", as_string)?,
        pair: record.required("pair", as_string)?,
        time: record.required("time", string_as_timestamp)?,
        side: record.required("type", as_string)?,
        order_type: record.required("ordertype", as_string)?,
        price: record.required("price", string_as_decimal)?,
        cost: record.required("cost", string_as_decimal)?,
        fee: record.required("fee", string_as_decimal)?,
        volume: record.required("vol", string_as_decimal)?,
        margin: record.optional("margin", string_as_decimal)?,
    })
}
