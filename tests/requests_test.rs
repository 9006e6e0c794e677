use serde_json::json;

use krakenfeed::models::{ChannelKind, Ping, Subscribe, Subscription, Unsubscribe};

fn pairs(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn serialize_ticker_subscribe() {
    let request = Subscribe::new(&pairs(&["XBT/EUR", "ETH/USD"]), Subscription::new(ChannelKind::Ticker))
        .with_reqid(7);

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "event": "subscribe",
            "reqid": 7,
            "pair": ["XBT/EUR", "ETH/USD"],
            "subscription": { "name": "ticker" }
        })
    );
}

#[test]
fn serialize_ohlc_subscribe() {
    let request = Subscribe::new(&pairs(&["XBT/EUR"]), Subscription::ohlc(5));
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["subscription"], json!({ "name": "ohlc", "interval": 5 }));
}

#[test]
fn serialize_private_subscribe_flags() {
    let subscription = Subscription::named("ownTrades")
        .with_snapshot(false)
        .with_ratecounter(true)
        .with_token("abc");
    let value = serde_json::to_value(Subscribe::new(&[], subscription)).unwrap();

    assert_eq!(
        value,
        json!({
            "event": "subscribe",
            "subscription": {
                "name": "ownTrades",
                "ratecounter": true,
                "snapshot": false,
                "token": "abc"
            }
        })
    );
}

#[test]
fn serialize_unsubscribe() {
    let request = Unsubscribe::new(&pairs(&["XBT/USD"]), Subscription::book(100)).with_reqid(1);

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "event": "unsubscribe",
            "reqid": 1,
            "pair": ["XBT/USD"],
            "subscription": { "name": "book", "depth": 100 }
        })
    );
}

#[test]
fn serialize_ping() {
    assert_eq!(
        serde_json::to_string(&Ping::default()).unwrap(),
        r#"{"event":"ping"}"#
    );
}
