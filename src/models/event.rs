//! Object-framed messages, discriminated by their `event` field.

use serde::Deserialize;

/// Server response to a [`Ping`](super::Ping).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pong {
    pub event: String,
    #[serde(default, alias = "ReqID")]
    pub reqid: Option<u64>,
}

/// Connection-level status sent right after connecting and on changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemStatus {
    pub event: String,
    #[serde(rename = "connectionID")]
    pub connection_id: u64,
    /// `"online"`, `"maintenance"`, `"cancel_only"`, `"limit_only"` or `"post_only"`.
    pub status: String,
    pub version: String,
}

/// Subscription parameters echoed back in a [`SubscriptionStatus`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubscriptionDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default)]
    pub interval: Option<u32>,
    #[serde(default, rename = "maxratecount")]
    pub max_rate_count: Option<u32>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Acknowledgement of a subscribe or unsubscribe request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscriptionStatus {
    pub event: String,
    #[serde(default, rename = "channelID")]
    pub channel_id: Option<i64>,
    #[serde(default, rename = "channelName")]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub reqid: Option<u64>,
    #[serde(default)]
    pub pair: Option<String>,
    /// `"subscribed"`, `"unsubscribed"` or `"error"`.
    pub status: String,
    #[serde(default)]
    pub subscription: SubscriptionDetails,
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
}

/// Any object with `"status": "error"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorMessage {
    #[serde(default)]
    pub event: String,
    pub status: String,
    #[serde(default, rename = "errorMessage")]
    pub error_message: String,
    #[serde(default)]
    pub reqid: Option<u64>,
}

/// Acknowledgement of an [`AddOrder`](super::AddOrder).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddOrderStatus {
    pub event: String,
    #[serde(default)]
    pub reqid: Option<u64>,
    pub status: String,
    /// Id of the new order.
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub descr: Option<String>,
}

/// Acknowledgement of a [`CancelOrder`](super::CancelOrder).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CancelOrderStatus {
    pub event: String,
    #[serde(default)]
    pub reqid: Option<u64>,
    pub status: String,
}

/// Acknowledgement of a [`CancelAll`](super::CancelAll).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CancelAllStatus {
    pub event: String,
    #[serde(default)]
    pub reqid: Option<u64>,
    pub status: String,
    /// Number of orders canceled.
    #[serde(default)]
    pub count: u64,
}
