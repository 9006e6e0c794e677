//! Object-framed messages, dispatched on the `event` field.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::{DecodeError, ResultExt};
use crate::models::Message;

/// Decodes an object frame.
///
/// `"status": "error"` takes precedence over the `event` value, so a
/// failed `addOrderStatus` or `subscriptionStatus` both become
/// [`Message::Error`].
pub(crate) fn decode_event(object: Map<String, Value>) -> Result<Message, DecodeError> {
    let event = object
        .get("event")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let is_error = object.get("status").and_then(Value::as_str) == Some("error");

    let value = Value::Object(object);
    let context = || format!("parsing {event} failed");

    if is_error {
        return parse(value).map(Message::Error).context(context);
    }

    match event.as_str() {
        "heartbeat" => Ok(Message::Heartbeat),
        "pong" => parse(value).map(Message::Pong).context(context),
        "subscriptionStatus" => parse(value)
            .map(Message::SubscriptionStatus)
            .context(context),
        "systemStatus" => parse(value).map(Message::SystemStatus).context(context),
        "addOrderStatus" => parse(value).map(Message::AddOrderStatus).context(context),
        "cancelOrderStatus" => parse(value)
            .map(Message::CancelOrderStatus)
            .context(context),
        "cancelAllStatus" => parse(value).map(Message::CancelAllStatus).context(context),
        _ => Err(DecodeError::UnknownEvent(event.clone())),
    }
}

fn parse<T: DeserializeOwned>(value: Value) -> Result<T, DecodeError> {
    Ok(serde_json::from_value(value)?)
}
