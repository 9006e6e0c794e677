//! Outbound requests.
//!
//! Every request carries a literal `event` discriminator which the
//! constructors fill in, so callers only supply the parameters.

use serde::Serialize;

use super::{ChannelKind, RedactedToken};

/// A `ping` request used to test connection liveness.
#[derive(Debug, Clone, Serialize)]
pub struct Ping {
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reqid: Option<u64>,
}

impl Ping {
    #[must_use]
    pub fn new() -> Self {
        Self {
            event: "ping".to_string(),
            reqid: None,
        }
    }

    /// Sets a request ID echoed back in the [`Pong`](super::Pong).
    #[must_use]
    pub fn with_reqid(mut self, reqid: u64) -> Self {
        self.reqid = Some(reqid);
        self
    }
}

impl Default for Ping {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel parameters of a subscribe or unsubscribe request.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    /// Candle interval in minutes (`ohlc` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratecounter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<RedactedToken>,
}

impl Subscription {
    /// Subscription to a public channel with default parameters.
    #[must_use]
    pub fn new(channel: ChannelKind) -> Self {
        Self::named(channel.as_str())
    }

    /// Subscription to a channel by wire name, e.g. `"ownTrades"`.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            depth: None,
            interval: None,
            ratecounter: None,
            snapshot: None,
            token: None,
        }
    }

    /// Book subscription with the given depth (10, 25, 100, 500 or 1000).
    #[must_use]
    pub fn book(depth: u32) -> Self {
        Self::new(ChannelKind::Book).with_depth(depth)
    }

    /// Candle subscription with the given interval in minutes.
    #[must_use]
    pub fn ohlc(interval: u32) -> Self {
        Self::new(ChannelKind::Ohlc).with_interval(interval)
    }

    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    #[must_use]
    pub fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    #[must_use]
    pub fn with_ratecounter(mut self, ratecounter: bool) -> Self {
        self.ratecounter = Some(ratecounter);
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(RedactedToken::new(token));
        self
    }
}

/// A `subscribe` request.
#[derive(Debug, Clone, Serialize)]
pub struct Subscribe {
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reqid: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pair: Vec<String>,
    pub subscription: Subscription,
}

impl Subscribe {
    #[must_use]
    pub fn new(pairs: &[String], subscription: Subscription) -> Self {
        Self {
            event: "subscribe".to_string(),
            reqid: None,
            pair: pairs.to_vec(),
            subscription,
        }
    }

    #[must_use]
    pub fn with_reqid(mut self, reqid: u64) -> Self {
        self.reqid = Some(reqid);
        self
    }
}

/// An `unsubscribe` request.
#[derive(Debug, Clone, Serialize)]
pub struct Unsubscribe {
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reqid: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pair: Vec<String>,
    pub subscription: Subscription,
}

impl Unsubscribe {
    #[must_use]
    pub fn new(pairs: &[String], subscription: Subscription) -> Self {
        Self {
            event: "unsubscribe".to_string(),
            reqid: None,
            pair: pairs.to_vec(),
            subscription,
        }
    }

    #[must_use]
    pub fn with_reqid(mut self, reqid: u64) -> Self {
        self.reqid = Some(reqid);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_omits_missing_reqid() {
        let value = serde_json::to_value(Ping::new()).unwrap();
        assert_eq!(value, serde_json::json!({ "event": "ping" }));

        let value = serde_json::to_value(Ping::new().with_reqid(7)).unwrap();
        assert_eq!(value["reqid"], 7);
    }

    #[test]
    fn book_subscription_carries_depth() {
        let pairs = vec!["XBT/EUR".to_string()];
        let request = Subscribe::new(&pairs, Subscription::book(25));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["event"], "subscribe");
        assert_eq!(value["pair"][0], "XBT/EUR");
        assert_eq!(value["subscription"]["name"], "book");
        assert_eq!(value["subscription"]["depth"], 25);
        assert!(value["subscription"].get("interval").is_none());
        assert!(value["subscription"].get("token").is_none());
    }

    #[test]
    fn private_subscription_has_no_pair() {
        let request = Subscribe::new(&[], Subscription::named("ownTrades").with_token("abc"));
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("pair").is_none());
        assert_eq!(value["subscription"]["token"], "abc");
        assert!(!format!("{request:?}").contains("abc"));
    }
}
