//! Reference quoting policy.
//!
//! One decision per order book snapshot:
//!
//! - Position below `-max_position`: quote the bid to reduce the short.
//! - Position above `+max_position`: quote the ask to reduce the long.
//! - Otherwise: pick a side with the configured [`SideChooser`].
//!
//! Quotes sit at the top of book with a fixed size, and are stamped with
//! `current_time + submission_delay`, the time the order is expected to be
//! live at the exchange. Existing outstanding orders are not consulted unless
//! `skip_if_side_outstanding` is set, so by default a new order is placed on
//! every snapshot even when an unfilled order on the same side already exists.

mod side;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use side::{FixedSide, RandomSide, SideChooser};

use crate::ledger::OrderLedger;
use crate::models::{ClientOrderId, Nanos, Order, OrderbookSnapshot, Side};

/// Quoting policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotePolicyConfig {
    /// Size of every quote.
    pub quote_size: Decimal,
    /// Delay between decision time and exchange-live time (nanoseconds).
    pub submission_delay_ns: Nanos,
    /// Skip quoting a side that already has an outstanding order.
    pub skip_if_side_outstanding: bool,
    /// Seed for the side chooser. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for QuotePolicyConfig {
    fn default() -> Self {
        Self {
            quote_size: Decimal::new(1, 3), // 0.001
            submission_delay_ns: 20,
            skip_if_side_outstanding: false,
            seed: None,
        }
    }
}

/// A priced quote not yet assigned a client order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Quote side.
    pub side: Side,
    /// Quote price.
    pub price: Decimal,
    /// Quote size.
    pub size: Decimal,
    /// Expected exchange-live time.
    pub creation_time: Nanos,
}

impl Quote {
    /// Turn the quote into an order with the given id.
    #[must_use]
    pub const fn into_order(self, client_order_id: ClientOrderId) -> Order {
        Order {
            client_order_id,
            side: self.side,
            size: self.size,
            price: self.price,
            creation_time: self.creation_time,
        }
    }
}

/// Why the policy declined to quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The chosen side of the book has no levels.
    EmptyBookSide(Side),
    /// An order on the chosen side is still outstanding.
    SideOutstanding(Side),
}

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteDecision {
    /// Place this quote.
    Place(Quote),
    /// Do nothing this snapshot.
    Skip(SkipReason),
}

/// Risk-bounded top-of-book quoting policy.
#[derive(Debug)]
pub struct QuotingPolicy<C> {
    config: QuotePolicyConfig,
    max_position: Decimal,
    chooser: C,
}

impl<C: SideChooser> QuotingPolicy<C> {
    /// Create a policy.
    pub const fn new(config: QuotePolicyConfig, max_position: Decimal, chooser: C) -> Self {
        Self {
            config,
            max_position,
            chooser,
        }
    }

    /// Pick the side to quote for the current position.
    pub fn choose_side(&mut self, position: Decimal) -> Side {
        if position < -self.max_position {
            Side::Bid
        } else if position > self.max_position {
            Side::Ask
        } else {
            self.chooser.choose()
        }
    }

    /// Decide what, if anything, to quote on this snapshot.
    pub fn decide(
        &mut self,
        book: &OrderbookSnapshot,
        position: Decimal,
        now: Nanos,
        ledger: &OrderLedger,
    ) -> QuoteDecision {
        let side = self.choose_side(position);

        if self.config.skip_if_side_outstanding && ledger.count_on_side(side) > 0 {
            debug!(side = %side, "Side already quoted, skipping");
            return QuoteDecision::Skip(SkipReason::SideOutstanding(side));
        }

        let Some(level) = book.best(side) else {
            return QuoteDecision::Skip(SkipReason::EmptyBookSide(side));
        };

        QuoteDecision::Place(Quote {
            side,
            price: level.price,
            size: self.config.quote_size,
            creation_time: now.saturating_add(self.config.submission_delay_ns),
        })
    }
}
