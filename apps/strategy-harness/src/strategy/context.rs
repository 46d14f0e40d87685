//! Explicit strategy state owned by the event loop.

use tracing::warn;

use crate::config::StrategyConfig;
use crate::ledger::{LifecycleManager, OrderIdGenerator, OrderLedger};
use crate::models::{Nanos, OrderbookSnapshot};
use crate::position::PositionTracker;

/// Strategy-local clock.
///
/// Set from each processed event's timestamp and never moves backwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyClock {
    now: Nanos,
}

impl StrategyClock {
    /// Create a clock at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    /// Current strategy time.
    #[must_use]
    pub const fn now(&self) -> Nanos {
        self.now
    }

    /// Move the clock to `timestamp`.
    ///
    /// A timestamp earlier than the current time leaves the clock unchanged
    /// and returns false.
    pub fn advance(&mut self, timestamp: Nanos) -> bool {
        if timestamp < self.now {
            warn!(
                current_time = self.now,
                event_time = timestamp,
                "Event timestamp behind strategy clock, keeping current time"
            );
            return false;
        }
        self.now = timestamp;
        true
    }
}

/// Everything the event loop mutates, in one place.
#[derive(Debug)]
pub struct StrategyContext {
    /// Run parameters.
    pub config: StrategyConfig,
    /// Outstanding orders.
    pub ledger: OrderLedger,
    /// Net exposure.
    pub position: PositionTracker,
    /// Strategy-local time.
    pub clock: StrategyClock,
    /// Last order book snapshot, `None` until the first one arrives.
    pub book: Option<OrderbookSnapshot>,
    /// Client order id source.
    pub ids: OrderIdGenerator,
    /// Lifetime enforcement.
    pub lifecycle: LifecycleManager,
}

impl StrategyContext {
    /// Create a fresh context: flat, empty ledger, clock at zero.
    #[must_use]
    pub fn new(config: StrategyConfig) -> Self {
        let lifecycle = LifecycleManager::new(config.order_lifetime_ns);
        Self {
            config,
            ledger: OrderLedger::new(),
            position: PositionTracker::new(),
            clock: StrategyClock::new(),
            book: None,
            ids: OrderIdGenerator::new(),
            lifecycle,
        }
    }

    /// Current strategy time.
    #[must_use]
    pub const fn now(&self) -> Nanos {
        self.clock.now()
    }
}
