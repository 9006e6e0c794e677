//! Open orders of the private `openOrders` channel.
//!
//! The first frame after subscribing carries every open order in full;
//! later frames carry only the fields that changed. [`OpenOrders`] keeps
//! the merged state keyed by order id.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::Timestamp;

/// Order statuses after which an order can no longer change.
const INACTIVE_STATUSES: [&str; 2] = ["canceled", "closed"];

/// Human-readable summary of an order's parameters (the `descr` object).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenOrderDescription {
    pub pair: String,
    /// `"buy"` or `"sell"`.
    pub side: String,
    pub order_type: String,
    pub price: Decimal,
    /// Secondary price for stop and take-profit limit orders.
    pub price2: Decimal,
    pub leverage: String,
    pub order: String,
    /// Conditional close order, if any.
    pub close: String,
}

/// One order as last reported by the exchange.
///
/// Zero and empty values stand for "not reported" in partial updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenOrder {
    pub ref_id: String,
    pub user_ref: i64,
    /// `"pending"`, `"open"`, `"closed"`, `"canceled"` or `"expired"`.
    pub status: String,
    pub open_time: Timestamp,
    pub start_time: Timestamp,
    pub expire_time: Timestamp,
    pub description: OpenOrderDescription,
    pub volume: Decimal,
    pub volume_executed: Decimal,
    pub cost: Decimal,
    pub fee: Decimal,
    pub avg_price: Decimal,
    pub limit_price: Decimal,
    pub stop_price: Decimal,
    pub misc: String,
    pub oflags: String,
    pub cancel_reason: String,
}

impl OpenOrder {
    /// Returns `true` once the order is closed or canceled.
    pub fn is_inactive(&self) -> bool {
        INACTIVE_STATUSES.contains(&self.status.as_str())
    }

    /// Overwrites every field that is set in `update`.
    fn merge(&mut self, update: OpenOrder) {
        overwrite(&mut self.ref_id, update.ref_id);
        overwrite(&mut self.user_ref, update.user_ref);
        overwrite(&mut self.status, update.status);
        overwrite(&mut self.open_time, update.open_time);
        overwrite(&mut self.start_time, update.start_time);
        overwrite(&mut self.expire_time, update.expire_time);
        overwrite(&mut self.description, update.description);
        overwrite(&mut self.volume, update.volume);
        overwrite(&mut self.volume_executed, update.volume_executed);
        overwrite(&mut self.cost, update.cost);
        overwrite(&mut self.fee, update.fee);
        overwrite(&mut self.avg_price, update.avg_price);
        overwrite(&mut self.limit_price, update.limit_price);
        overwrite(&mut self.stop_price, update.stop_price);
        overwrite(&mut self.misc, update.misc);
        overwrite(&mut self.oflags, update.oflags);
        overwrite(&mut self.cancel_reason, update.cancel_reason);
    }
}

/// Replaces `current` unless `update` is the zero value.
fn overwrite<T: Default + PartialEq>(current: &mut T, update: T) {
    if update != T::default() {
        *current = update;
    }
}

/// Open orders keyed by order id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenOrders {
    pub orders: HashMap<String, OpenOrder>,
}

impl OpenOrders {
    /// Merges an `openOrders` frame into this state.
    ///
    /// Unknown ids are inserted as they are. For known ids only the
    /// fields set in the update are overwritten, so a fill that reports
    /// just `cost`, `fee` and `vol_exec` keeps the rest of the order.
    pub fn update(&mut self, update: OpenOrders) {
        for (id, order) in update.orders {
            match self.orders.get_mut(&id) {
                Some(current) => current.merge(order),
                None => {
                    self.orders.insert(id, order);
                }
            }
        }
    }

    /// Drops every order whose status is `canceled` or `closed`.
    pub fn delete_inactive_orders(&mut self) {
        self.orders.retain(|_, order| !order.is_inactive());
    }

    pub fn get(&self, id: &str) -> Option<&OpenOrder> {
        self.orders.get(id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    const ORDER_ID: &str = "OGTT3Y-C6I3P-XRI6HX";

    fn pending_order() -> OpenOrder {
        OpenOrder {
            ref_id: "OKIVMP-5GVZN-Z2D2UA".to_string(),
            status: "pending".to_string(),
            description: OpenOrderDescription {
                pair: "XBT/EUR".to_string(),
                side: "sell".to_string(),
                order_type: "limit".to_string(),
                price: dec!(34.50000),
                price2: dec!(55.00000),
                leverage: "0:1".to_string(),
                order: "sell 10.00345345 XBT/EUR @ limit 34.50000 with 0:1 leverage".to_string(),
                close: String::new(),
            },
            volume: dec!(10.00345345),
            volume_executed: dec!(9.00000000),
            cost: dec!(1.00000),
            limit_price: dec!(34.50000),
            oflags: "fcib".to_string(),
            ..OpenOrder::default()
        }
    }

    fn state() -> OpenOrders {
        single(pending_order())
    }

    fn single(order: OpenOrder) -> OpenOrders {
        OpenOrders {
            orders: HashMap::from([(ORDER_ID.to_string(), order)]),
        }
    }

    #[test]
    fn initial_update_inserts_orders() {
        let mut orders = OpenOrders::default();
        orders.update(state());
        assert_eq!(orders, state());
    }

    #[test]
    fn status_update_keeps_other_fields() {
        let mut orders = state();
        orders.update(single(OpenOrder {
            status: "open".to_string(),
            ..OpenOrder::default()
        }));

        let mut expected = pending_order();
        expected.status = "open".to_string();
        assert_eq!(orders.get(ORDER_ID), Some(&expected));
    }

    #[test]
    fn fill_update_then_close() {
        let mut orders = state();
        let fill = OpenOrder {
            cost: dec!(30.00000163),
            volume_executed: dec!(70.90020000),
            fee: dec!(0.04800000),
            avg_price: dec!(0.42313000),
            ..OpenOrder::default()
        };
        orders.update(single(fill.clone()));

        let mut expected = pending_order();
        expected.cost = dec!(30.00000163);
        expected.volume_executed = dec!(70.90020000);
        expected.fee = dec!(0.04800000);
        expected.avg_price = dec!(0.42313000);
        assert_eq!(orders.get(ORDER_ID), Some(&expected));

        orders.update(single(OpenOrder {
            status: "closed".to_string(),
            ..fill
        }));
        expected.status = "closed".to_string();
        assert_eq!(orders.get(ORDER_ID), Some(&expected));
    }

    #[test]
    fn zero_values_do_not_overwrite() {
        let mut orders = state();
        orders.update(single(OpenOrder {
            status: "canceled".to_string(),
            cost: dec!(0.00000000),
            volume_executed: dec!(0.00000000),
            fee: dec!(0.00000000),
            avg_price: dec!(0.00000000),
            ..OpenOrder::default()
        }));

        let mut expected = pending_order();
        expected.status = "canceled".to_string();
        assert_eq!(orders.get(ORDER_ID), Some(&expected));
    }

    #[test]
    fn delete_inactive_orders_keeps_live_ones() {
        let mut orders = OpenOrders::default();
        for (id, status) in [
            ("A", "pending"),
            ("B", "open"),
            ("C", "closed"),
            ("D", "canceled"),
            ("E", "expired"),
        ] {
            orders.update(OpenOrders {
                orders: HashMap::from([(
                    id.to_string(),
                    OpenOrder {
                        status: status.to_string(),
                        ..OpenOrder::default()
                    },
                )]),
            });
        }

        orders.delete_inactive_orders();

        let mut ids: Vec<&str> = orders.orders.keys().map(String::as_str).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["A", "B", "E"]);
    }
}
