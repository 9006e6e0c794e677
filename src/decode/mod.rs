//! Wire decoder.
//!
//! One stream multiplexes two framing styles: JSON objects tagged with an
//! `event` field (heartbeats, pongs, status and acknowledgements) and
//! JSON arrays carrying channel data. [`decode`] classifies each frame
//! first, then runs the parser for its kind:
//!
//! 1. An object is dispatched on `status == "error"`, then on `event`.
//! 2. A three-element array is a private channel frame
//!    (`openOrders`, `ownTrades`) and is dispatched on its channel name.
//! 3. Anything else is treated as a public array frame and dispatched on
//!    the prefix of its channel name (`"book-10"` → `book`).
//!
//! Each frame produces exactly one [`Message`] or one [`DecodeError`].

mod channel;
mod error;
mod event;
mod fields;
mod private;

use serde_json::Value;

pub use error::DecodeError;

use crate::models::Message;

/// Decodes one complete text frame.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the frame is not valid JSON, names an
/// unknown event or channel, or does not match the schema of its kind.
/// The error chain names the message kind and the offset or field that
/// failed.
pub fn decode(bytes: &[u8]) -> Result<Message, DecodeError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(object) => event::decode_event(object),
        Value::Array(items) if items.len() == private::FRAME_LEN => {
            private::decode_private(&items)
        }
        other => channel::decode_channel(other),
    }
}

/// Decodes one complete text frame given as a string.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_str(text: &str) -> Result<Message, DecodeError> {
    decode(text.as_bytes())
}
