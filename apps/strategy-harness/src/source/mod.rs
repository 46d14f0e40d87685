//! Clock/event source contract.
//!
//! The strategy pulls events one at a time from an [`EventSource`] and sends
//! place/cancel actions back to it. Actions are fire-and-forget: their
//! acknowledgements come back later through [`EventSource::next_event`].
//!
//! The source is responsible for delivering events in non-decreasing
//! timestamp order. The strategy does not re-sort or buffer.

mod error;
mod replay;

pub use error::SourceError;
pub use replay::{ReplaySource, ReplaySourceConfig};

use crate::models::{Event, Order, OrderCancelRequest};

/// Exchange-simulation collaborator driven by the strategy.
pub trait EventSource {
    /// Pull the next event, or `None` once the stream is exhausted.
    fn next_event(&mut self) -> Option<Event>;

    /// Submit a new order.
    fn submit_order(&mut self, order: &Order);

    /// Submit a cancellation.
    fn submit_cancel(&mut self, cancel: &OrderCancelRequest);

    /// Get the name of this source.
    fn name(&self) -> &'static str;
}
