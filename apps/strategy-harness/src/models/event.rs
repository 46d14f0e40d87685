//! Events pulled from the exchange simulator and the actions they acknowledge.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::market::MarketUpdate;
use super::order::{ClientOrderId, Nanos, Order, OrderCancelRequest, OwnTrade};

/// Action submitted by the strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Place a new order.
    Place(Order),
    /// Cancel a previously placed order.
    Cancel(OrderCancelRequest),
}

impl Action {
    /// Order the action refers to.
    #[must_use]
    pub const fn client_order_id(&self) -> ClientOrderId {
        match self {
            Self::Place(order) => order.client_order_id,
            Self::Cancel(cancel) => cancel.client_order_id,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place(order) => order.fmt(f),
            Self::Cancel(cancel) => cancel.fmt(f),
        }
    }
}

/// Exchange verdict on a submitted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    /// Action accepted.
    Ok,
    /// Action refused by the exchange.
    Rejected,
    /// Target order unknown to the exchange.
    NotFound,
}

impl ResponseCode {
    /// Returns true for `Ok`.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

/// Acknowledgement of a submitted order or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    /// The acknowledged action.
    pub action: Action,
    /// Exchange verdict.
    pub code: ResponseCode,
    /// Time the response reached the strategy.
    pub receive_time: Nanos,
}

/// A single event from the exchange simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Market data.
    Market(MarketUpdate),
    /// Fill of one of our orders.
    OwnTrade(OwnTrade),
    /// Acknowledgement of one of our actions.
    Response(ActionResponse),
}

impl Event {
    /// Effective timestamp of the event on the strategy clock.
    #[must_use]
    pub const fn timestamp(&self) -> Nanos {
        match self {
            Self::Market(update) => update.receive_time(),
            Self::OwnTrade(trade) => trade.receive_time,
            Self::Response(response) => response.receive_time,
        }
    }

    /// Short name of the event kind, for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Market(MarketUpdate::Orderbook(_)) => "orderbook",
            Self::Market(MarketUpdate::Trade(_)) => "trade",
            Self::Market(MarketUpdate::Heartbeat { .. }) => "heartbeat",
            Self::OwnTrade(_) => "own_trade",
            Self::Response(_) => "action_response",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market(update) => update.fmt(f),
            Self::OwnTrade(trade) => trade.fmt(f),
            Self::Response(response) => write!(
                f,
                "ActionResponse(code={}, receive_time={}, action={})",
                response.code, response.receive_time, response.action
            ),
        }
    }
}
