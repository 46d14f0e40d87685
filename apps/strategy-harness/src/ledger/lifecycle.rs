//! Lifetime enforcement for outstanding orders.

use tracing::debug;

use super::OrderLedger;
use crate::models::{Nanos, OrderCancelRequest};

/// Cancels orders that outlive the configured lifetime.
///
/// Removal from the ledger is optimistic: an expired order leaves the ledger
/// as soon as its cancel is issued, without waiting for the acknowledgement.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleManager {
    order_lifetime: Nanos,
}

impl LifecycleManager {
    /// Create a manager with the given order lifetime (nanoseconds).
    #[must_use]
    pub const fn new(order_lifetime: Nanos) -> Self {
        Self { order_lifetime }
    }

    /// Configured order lifetime.
    #[must_use]
    pub const fn order_lifetime(&self) -> Nanos {
        self.order_lifetime
    }

    /// Remove every expired order from the ledger and return the cancel
    /// requests to send, oldest order first.
    pub fn expire(&self, ledger: &mut OrderLedger, now: Nanos) -> Vec<OrderCancelRequest> {
        ledger
            .sweep(now, self.order_lifetime)
            .into_iter()
            .filter_map(|id| ledger.remove(id))
            .map(|order| {
                debug!(
                    order_id = order.client_order_id,
                    side = %order.side,
                    age = order.age(now),
                    "Order expired, issuing cancel"
                );
                OrderCancelRequest {
                    client_order_id: order.client_order_id,
                    request_time: now,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{ClientOrderId, Order, Side};

    fn order(id: ClientOrderId, creation_time: Nanos) -> Order {
        Order {
            client_order_id: id,
            side: Side::Ask,
            size: dec!(0.001),
            price: dec!(101),
            creation_time,
        }
    }

    #[test]
    fn test_expiry_scenario_cancels_exactly_once() {
        let manager = LifecycleManager::new(100);
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, 0)).unwrap();

        let cancels = manager.expire(&mut ledger, 101);
        assert_eq!(
            cancels,
            vec![OrderCancelRequest {
                client_order_id: 1,
                request_time: 101,
            }]
        );
        assert!(!ledger.contains(1));

        assert!(manager.expire(&mut ledger, 102).is_empty());
        assert!(manager.expire(&mut ledger, 500).is_empty());
    }

    #[test]
    fn test_live_orders_are_kept() {
        let manager = LifecycleManager::new(100);
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, 0)).unwrap();
        ledger.register(order(2, 60)).unwrap();

        let cancels = manager.expire(&mut ledger, 120);

        assert_eq!(cancels.len(), 1);
        assert_eq!(cancels[0].client_order_id, 1);
        assert!(ledger.contains(2));
        assert_eq!(manager.order_lifetime(), 100);
    }

    proptest! {
        #[test]
        fn prop_cancel_issued_on_first_sweep_past_lifetime(
            creation in 0u64..1_000,
            lifetime in 1u64..1_000,
            steps in proptest::collection::vec(1u64..50, 1..100),
        ) {
            let manager = LifecycleManager::new(lifetime);
            let mut ledger = OrderLedger::new();
            ledger.register(order(1, creation)).unwrap();

            let due = creation + lifetime;
            let mut now = 0;
            let mut first_due_sweep = None;
            let mut cancelled_at = None;
            for step in steps {
                now += step;
                if now >= due && first_due_sweep.is_none() {
                    first_due_sweep = Some(now);
                }
                let cancels = manager.expire(&mut ledger, now);
                if !cancels.is_empty() {
                    prop_assert!(cancelled_at.is_none());
                    cancelled_at = Some(now);
                }
            }

            prop_assert_eq!(cancelled_at, first_due_sweep);
        }
    }
}
