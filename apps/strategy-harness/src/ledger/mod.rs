//! Order ledger: the authoritative record of outstanding orders.
//!
//! The ledger keeps orders keyed by client order id together with their
//! registration order. Lifetime sweeps walk the registration order
//! oldest-first and stop at the first order still within its lifetime; this
//! is only sound while orders arrive in non-decreasing `creation_time`, so
//! the ledger falls back to a full scan as soon as that ordering is broken.

mod error;
mod ids;
mod lifecycle;

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

pub use error::LedgerError;
pub use ids::OrderIdGenerator;
pub use lifecycle::LifecycleManager;

use crate::models::{ClientOrderId, Nanos, Order, Side};

/// Ledger state of a registered order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    /// Placed, no acknowledgement received yet.
    Pending,
    /// Acknowledged by the exchange.
    Outstanding,
}

/// An order held by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// The order.
    pub order: Order,
    /// Acknowledgement state.
    pub state: OrderState,
}

/// Authoritative mapping from client order id to outstanding order.
#[derive(Debug)]
pub struct OrderLedger {
    entries: HashMap<ClientOrderId, LedgerEntry>,
    /// Ids in registration order. May hold ids already removed from `entries`.
    registration_order: VecDeque<ClientOrderId>,
    last_creation_time: Option<Nanos>,
    creation_ordered: bool,
    bids: usize,
    asks: usize,
}

impl OrderLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            registration_order: VecDeque::new(),
            last_creation_time: None,
            creation_ordered: true,
            bids: 0,
            asks: 0,
        }
    }

    /// Register an order as outstanding (in `Pending` state).
    pub fn register(&mut self, order: Order) -> Result<(), LedgerError> {
        let id = order.client_order_id;
        if self.entries.contains_key(&id) {
            return Err(LedgerError::DuplicateId(id));
        }

        if let Some(last) = self.last_creation_time
            && order.creation_time < last
            && self.creation_ordered
        {
            warn!(
                order_id = id,
                creation_time = order.creation_time,
                last_creation_time = last,
                "Order registered out of creation-time order, sweeps fall back to full scan"
            );
            self.creation_ordered = false;
        }
        self.last_creation_time = Some(
            self.last_creation_time
                .map_or(order.creation_time, |last| last.max(order.creation_time)),
        );

        match order.side {
            Side::Bid => self.bids += 1,
            Side::Ask => self.asks += 1,
        }
        self.registration_order.push_back(id);
        self.entries.insert(
            id,
            LedgerEntry {
                order,
                state: OrderState::Pending,
            },
        );
        Ok(())
    }

    /// Mark an order as acknowledged.
    ///
    /// Returns false if the order is no longer in the ledger; an absent id
    /// has already reached a terminal state and is not re-inserted.
    pub fn confirm(&mut self, id: ClientOrderId) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.state = OrderState::Outstanding;
                true
            }
            None => false,
        }
    }

    /// Remove an order, returning it if present.
    ///
    /// `None` is the non-fatal "not found" signal: a fill and a lifetime
    /// cancel can race for the same order.
    pub fn remove(&mut self, id: ClientOrderId) -> Option<Order> {
        let Some(entry) = self.entries.remove(&id) else {
            debug!(order_id = id, "Order not found in ledger");
            return None;
        };

        match entry.order.side {
            Side::Bid => self.bids -= 1,
            Side::Ask => self.asks -= 1,
        }
        if self.entries.is_empty() {
            self.reset_ordering();
        }
        Some(entry.order)
    }

    /// Collect ids of orders whose age at `now` has reached `max_age`,
    /// oldest first. Orders are not removed.
    pub fn sweep(&mut self, now: Nanos, max_age: Nanos) -> Vec<ClientOrderId> {
        if self.creation_ordered {
            self.sweep_ordered(now, max_age)
        } else {
            self.sweep_full(now, max_age)
        }
    }

    fn sweep_ordered(&mut self, now: Nanos, max_age: Nanos) -> Vec<ClientOrderId> {
        // Drop ids retired since the last sweep that sit at the front.
        while let Some(front) = self.registration_order.front() {
            if self.entries.contains_key(front) {
                break;
            }
            self.registration_order.pop_front();
        }

        let mut expired = Vec::new();
        for id in &self.registration_order {
            let Some(entry) = self.entries.get(id) else {
                continue;
            };
            if entry.order.age(now) >= max_age {
                expired.push(*id);
            } else {
                break;
            }
        }
        expired
    }

    fn sweep_full(&mut self, now: Nanos, max_age: Nanos) -> Vec<ClientOrderId> {
        let entries = &self.entries;
        self.registration_order.retain(|id| entries.contains_key(id));

        let mut expired: Vec<&Order> = self
            .registration_order
            .iter()
            .filter_map(|id| entries.get(id))
            .map(|entry| &entry.order)
            .filter(|order| order.age(now) >= max_age)
            .collect();
        expired.sort_by_key(|order| (order.creation_time, order.client_order_id));
        expired.iter().map(|order| order.client_order_id).collect()
    }

    fn reset_ordering(&mut self) {
        self.registration_order.clear();
        self.last_creation_time = None;
        self.creation_ordered = true;
    }

    /// Look up an order.
    #[must_use]
    pub fn get(&self, id: ClientOrderId) -> Option<&LedgerEntry> {
        self.entries.get(&id)
    }

    /// Check whether an order is outstanding.
    #[must_use]
    pub fn contains(&self, id: ClientOrderId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of outstanding orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no orders are outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of outstanding orders on a side.
    #[must_use]
    pub const fn count_on_side(&self, side: Side) -> usize {
        match side {
            Side::Bid => self.bids,
            Side::Ask => self.asks,
        }
    }

    /// Whether sweeps may stop at the first unexpired order.
    #[must_use]
    pub const fn is_creation_ordered(&self) -> bool {
        self.creation_ordered
    }

    /// Outstanding orders in registration order.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.registration_order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|entry| &entry.order)
    }
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn order(id: ClientOrderId, side: Side, creation_time: Nanos) -> Order {
        Order {
            client_order_id: id,
            side,
            size: dec!(0.001),
            price: dec!(100),
            creation_time,
        }
    }

    #[test]
    fn test_register_and_remove() {
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, Side::Bid, 0)).unwrap();

        assert!(ledger.contains(1));
        assert_eq!(ledger.get(1).map(|e| e.state), Some(OrderState::Pending));
        assert_eq!(ledger.count_on_side(Side::Bid), 1);

        let removed = ledger.remove(1).unwrap();
        assert_eq!(removed.client_order_id, 1);
        assert!(ledger.is_empty());
        assert_eq!(ledger.count_on_side(Side::Bid), 0);
    }

    #[test]
    fn test_duplicate_id_is_rejected_without_overwrite() {
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, Side::Bid, 0)).unwrap();

        let result = ledger.register(order(1, Side::Ask, 5));

        assert_eq!(result, Err(LedgerError::DuplicateId(1)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(1).map(|e| e.order.side), Some(Side::Bid));
        assert_eq!(ledger.count_on_side(Side::Ask), 0);
    }

    #[test]
    fn test_remove_absent_is_idempotent() {
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, Side::Bid, 0)).unwrap();
        ledger.register(order(2, Side::Ask, 0)).unwrap();

        assert!(ledger.remove(1).is_some());
        assert!(ledger.remove(1).is_none());
        assert!(ledger.remove(99).is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_confirm_only_touches_present_orders() {
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, Side::Bid, 0)).unwrap();

        assert!(ledger.confirm(1));
        assert_eq!(ledger.get(1).map(|e| e.state), Some(OrderState::Outstanding));
        assert!(ledger.confirm(1));

        ledger.remove(1);
        assert!(!ledger.confirm(1));
        assert!(!ledger.contains(1));
    }

    #[test]
    fn test_sweep_stops_at_first_live_order() {
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, Side::Bid, 0)).unwrap();
        ledger.register(order(2, Side::Ask, 10)).unwrap();
        ledger.register(order(3, Side::Bid, 50)).unwrap();

        assert_eq!(ledger.sweep(99, 100), Vec::<ClientOrderId>::new());
        assert_eq!(ledger.sweep(109, 100), vec![1]);
        assert_eq!(ledger.sweep(110, 100), vec![1, 2]);
        // Sweep does not remove.
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_sweep_boundary_is_inclusive() {
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, Side::Bid, 0)).unwrap();

        assert!(ledger.sweep(99, 100).is_empty());
        assert_eq!(ledger.sweep(100, 100), vec![1]);
    }

    #[test]
    fn test_sweep_skips_filled_orders() {
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, Side::Bid, 0)).unwrap();
        ledger.register(order(2, Side::Ask, 5)).unwrap();
        ledger.register(order(3, Side::Bid, 10)).unwrap();

        ledger.remove(2);

        assert_eq!(ledger.sweep(200, 100), vec![1, 3]);
    }

    #[test]
    fn test_out_of_order_registration_uses_full_scan() {
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, Side::Bid, 100)).unwrap();
        ledger.register(order(2, Side::Ask, 0)).unwrap();

        assert!(!ledger.is_creation_ordered());
        // Early stop would miss order 2 behind the still-live order 1.
        assert_eq!(ledger.sweep(150, 100), vec![2]);
        assert_eq!(ledger.sweep(250, 100), vec![2, 1]);
    }

    #[test]
    fn test_ordering_rearms_when_drained() {
        let mut ledger = OrderLedger::new();
        ledger.register(order(1, Side::Bid, 100)).unwrap();
        ledger.register(order(2, Side::Ask, 0)).unwrap();
        assert!(!ledger.is_creation_ordered());

        ledger.remove(1);
        ledger.remove(2);

        assert!(ledger.is_creation_ordered());
        ledger.register(order(3, Side::Bid, 10)).unwrap();
        assert_eq!(ledger.orders().count(), 1);
    }

    #[test]
    fn test_orders_iterates_registration_order() {
        let mut ledger = OrderLedger::new();
        for id in 1..=4 {
            ledger.register(order(id, Side::Bid, id * 10)).unwrap();
        }
        ledger.remove(2);

        let ids: Vec<ClientOrderId> = ledger.orders().map(|o| o.client_order_id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }
}
