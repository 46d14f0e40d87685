//! Core domain models for the strategy harness.
//!
//! These types define the events the exchange simulator delivers and the
//! actions the strategy sends back: orders, cancellations, fills, book
//! snapshots, and acknowledgements.

mod event;
mod market;
mod order;

pub use event::{Action, ActionResponse, Event, ResponseCode};
pub use market::{MarketUpdate, OrderbookSnapshot, PriceLevel, PublicTrade};
pub use order::{ClientOrderId, Nanos, Order, OrderCancelRequest, OwnTrade, Side};
