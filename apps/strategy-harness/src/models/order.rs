//! Order-related types for lifecycle tracking.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Nanoseconds on the strategy-local clock.
pub type Nanos = u64;

/// Locally generated order identifier. Starts at 1 and is never reused.
pub type ClientOrderId = u64;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Buy at the bid.
    Bid,
    /// Sell at the ask.
    Ask,
}

impl Side {
    /// Signed notional of a fill on this side: positive for bids, negative for asks.
    #[must_use]
    pub fn signed_notional(self, size: Decimal, price: Decimal) -> Decimal {
        match self {
            Self::Bid => size * price,
            Self::Ask => -(size * price),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid => write!(f, "BID"),
            Self::Ask => write!(f, "ASK"),
        }
    }
}

/// Intent to trade, owned by the order ledger once placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Client order ID.
    pub client_order_id: ClientOrderId,
    /// Order side.
    pub side: Side,
    /// Order size (positive).
    pub size: Decimal,
    /// Limit price (positive).
    pub price: Decimal,
    /// Time the order is expected to be live at the exchange.
    pub creation_time: Nanos,
}

impl Order {
    /// Age of the order at `now`. Zero while `now` is before `creation_time`.
    #[must_use]
    pub const fn age(&self, now: Nanos) -> Nanos {
        now.saturating_sub(self.creation_time)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order(id={}, side={}, size={}, price={}, creation_time={})",
            self.client_order_id, self.side, self.size, self.price, self.creation_time
        )
    }
}

/// Request to withdraw a previously placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelRequest {
    /// Target order.
    pub client_order_id: ClientOrderId,
    /// Strategy time the cancel was issued.
    pub request_time: Nanos,
}

impl fmt::Display for OrderCancelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrderCancel(id={}, request_time={})",
            self.client_order_id, self.request_time
        )
    }
}

/// Confirmed fill against one of the strategy's own orders.
///
/// Fills are treated as complete; partial fills are not modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnTrade {
    /// Filled order.
    pub client_order_id: ClientOrderId,
    /// Side of our order.
    pub side: Side,
    /// Fill size.
    pub size: Decimal,
    /// Fill price.
    pub price: Decimal,
    /// Time the fill reached the strategy.
    pub receive_time: Nanos,
}

impl fmt::Display for OwnTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OwnTrade(id={}, side={}, size={}, price={}, receive_time={})",
            self.client_order_id, self.side, self.size, self.price, self.receive_time
        )
    }
}
