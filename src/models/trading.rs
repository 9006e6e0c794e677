//! Order management requests for the private stream.
//!
//! Each request needs the session token; [`Session`](crate::websocket::Session)
//! fills it in when sending, replacing any token set here.

use rust_decimal::Decimal;
use serde::Serialize;

use super::RedactedToken;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Order type as named by the `ordertype` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Market,
    Limit,
    StopLoss,
    TakeProfit,
    StopLossLimit,
    TakeProfitLimit,
    SettlePosition,
}

/// An `addOrder` request.
///
/// Prices and volumes are sent as decimal strings at the scale they were
/// given in.
#[derive(Debug, Clone, Serialize)]
pub struct AddOrder {
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<RedactedToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reqid: Option<u64>,
    pub ordertype: OrderType,
    #[serde(rename = "type")]
    pub side: OrderSide,
    pub pair: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price2: Option<String>,
    pub volume: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<String>,
    /// Comma-separated order flags, e.g. `"post,fciq"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oflags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userref: Option<i64>,
    /// Validate the order without submitting it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<bool>,
}

impl AddOrder {
    #[must_use]
    pub fn new(order_type: OrderType, side: OrderSide, pair: &str, volume: Decimal) -> Self {
        Self {
            event: "addOrder".to_string(),
            token: None,
            reqid: None,
            ordertype: order_type,
            side,
            pair: pair.to_string(),
            price: None,
            price2: None,
            volume: volume.to_string(),
            leverage: None,
            oflags: None,
            userref: None,
            validate: None,
        }
    }

    #[must_use]
    pub fn market(side: OrderSide, pair: &str, volume: Decimal) -> Self {
        Self::new(OrderType::Market, side, pair, volume)
    }

    #[must_use]
    pub fn limit(side: OrderSide, pair: &str, volume: Decimal, price: Decimal) -> Self {
        Self::new(OrderType::Limit, side, pair, volume).with_price(price)
    }

    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price.to_string());
        self
    }

    #[must_use]
    pub fn with_price2(mut self, price2: Decimal) -> Self {
        self.price2 = Some(price2.to_string());
        self
    }

    #[must_use]
    pub fn with_leverage(mut self, leverage: &str) -> Self {
        self.leverage = Some(leverage.to_string());
        self
    }

    #[must_use]
    pub fn with_oflags(mut self, oflags: &str) -> Self {
        self.oflags = Some(oflags.to_string());
        self
    }

    #[must_use]
    pub fn with_userref(mut self, userref: i64) -> Self {
        self.userref = Some(userref);
        self
    }

    #[must_use]
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = Some(validate);
        self
    }

    #[must_use]
    pub fn with_reqid(mut self, reqid: u64) -> Self {
        self.reqid = Some(reqid);
        self
    }
}

/// A `cancelOrder` request for one or more order or trade ids.
#[derive(Debug, Clone, Serialize)]
pub struct CancelOrder {
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<RedactedToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reqid: Option<u64>,
    pub txid: Vec<String>,
}

impl CancelOrder {
    #[must_use]
    pub fn new(txids: &[String]) -> Self {
        Self {
            event: "cancelOrder".to_string(),
            token: None,
            reqid: None,
            txid: txids.to_vec(),
        }
    }

    #[must_use]
    pub fn with_reqid(mut self, reqid: u64) -> Self {
        self.reqid = Some(reqid);
        self
    }
}

/// A `cancelAll` request.
#[derive(Debug, Clone, Serialize)]
pub struct CancelAll {
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<RedactedToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reqid: Option<u64>,
}

impl CancelAll {
    #[must_use]
    pub fn new() -> Self {
        Self {
            event: "cancelAll".to_string(),
            token: None,
            reqid: None,
        }
    }

    #[must_use]
    pub fn with_reqid(mut self, reqid: u64) -> Self {
        self.reqid = Some(reqid);
        self
    }
}

impl Default for CancelAll {
    fn default() -> Self {
        Self::new()
    }
}
