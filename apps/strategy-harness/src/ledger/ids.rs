//! Client order id generation.

use crate::models::ClientOrderId;

/// Monotonic client order id generator.
///
/// Yields 1, 2, 3, ... and never repeats for the lifetime of the generator.
#[derive(Debug)]
pub struct OrderIdGenerator {
    next: ClientOrderId,
}

impl OrderIdGenerator {
    /// Create a generator whose first id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next id.
    pub const fn next_id(&mut self) -> ClientOrderId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Peek at the id the next call will return.
    #[must_use]
    pub const fn peek(&self) -> ClientOrderId {
        self.next
    }
}

impl Default for OrderIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_first_id_is_one() {
        let mut ids = OrderIdGenerator::new();
        assert_eq!(ids.peek(), 1);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.peek(), 3);
    }

    proptest! {
        #[test]
        fn prop_ids_strictly_increase_from_one(calls in 1usize..500) {
            let mut ids = OrderIdGenerator::default();
            let drawn: Vec<ClientOrderId> = (0..calls).map(|_| ids.next_id()).collect();

            prop_assert_eq!(drawn[0], 1);
            for pair in drawn.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }
    }
}
