//! In-memory replay exchange stub.
//!
//! Replays a scripted event stream and answers the strategy's actions with
//! acknowledgements after a fixed latency. There is no matching engine: fills
//! only happen when the script contains an `OwnTrade`.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::EventSource;
use super::error::SourceError;
use crate::models::{
    Action, ActionResponse, ClientOrderId, Event, Nanos, Order, OrderCancelRequest, ResponseCode,
};

/// Replay stub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySourceConfig {
    /// Delay between an action and its acknowledgement (nanoseconds).
    pub ack_latency_ns: Nanos,
}

impl Default for ReplaySourceConfig {
    fn default() -> Self {
        Self {
            ack_latency_ns: 10_000_000,
        }
    }
}

/// Event wrapper ordered as a min-heap on (timestamp, sequence).
#[derive(Debug)]
struct ScheduledEvent {
    event: Event,
    sequence: u64,
}

impl ScheduledEvent {
    const fn key(&self) -> (Nanos, u64) {
        (self.event.timestamp(), self.sequence)
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: earliest timestamp, then earliest scheduled, pops first.
        other.key().cmp(&self.key())
    }
}

/// Scripted exchange stub implementing [`EventSource`].
#[derive(Debug, Default)]
pub struct ReplaySource {
    config: ReplaySourceConfig,
    queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
    live_orders: HashSet<ClientOrderId>,
    rejected_ids: HashSet<ClientOrderId>,
    submitted_orders: Vec<Order>,
    submitted_cancels: Vec<OrderCancelRequest>,
    delivered: u64,
}

impl ReplaySource {
    /// Create an empty stub.
    #[must_use]
    pub fn new(config: ReplaySourceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a stub preloaded with scripted events.
    #[must_use]
    pub fn with_events(config: ReplaySourceConfig, events: impl IntoIterator<Item = Event>) -> Self {
        let mut source = Self::new(config);
        for event in events {
            source.push(event);
        }
        source
    }

    /// Load scripted events from JSON lines, one [`Event`] per line.
    ///
    /// Blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or a line is not a valid event.
    pub fn from_json_lines<R: BufRead>(
        config: ReplaySourceConfig,
        reader: R,
    ) -> Result<Self, SourceError> {
        let mut source = Self::new(config);
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event = serde_json::from_str(&line).map_err(|err| SourceError::Parse {
                line: index + 1,
                source: err,
            })?;
            source.push(event);
        }

        info!(events = source.queue.len(), "Loaded scripted events");
        Ok(source)
    }

    /// Load scripted events from a JSON lines file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn from_path(config: ReplaySourceConfig, path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Self::from_json_lines(config, BufReader::new(file))
    }

    /// Schedule an event for delivery.
    pub fn push(&mut self, event: Event) {
        self.sequence_counter += 1;
        self.queue.push(ScheduledEvent {
            event,
            sequence: self.sequence_counter,
        });
    }

    /// Answer the placement of this id with `Rejected` instead of `Ok`.
    pub fn reject_placement(&mut self, id: ClientOrderId) {
        self.rejected_ids.insert(id);
    }

    /// Orders submitted so far, in submission order.
    #[must_use]
    pub fn submitted_orders(&self) -> &[Order] {
        &self.submitted_orders
    }

    /// Cancels submitted so far, in submission order.
    #[must_use]
    pub fn submitted_cancels(&self) -> &[OrderCancelRequest] {
        &self.submitted_cancels
    }

    /// Check whether the stub still considers an order live.
    #[must_use]
    pub fn is_live(&self, id: ClientOrderId) -> bool {
        self.live_orders.contains(&id)
    }

    /// Events still queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Events delivered so far.
    #[must_use]
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }

    fn respond(&mut self, action: Action, code: ResponseCode, sent_at: Nanos) {
        let receive_time = sent_at.saturating_add(self.config.ack_latency_ns);
        self.push(Event::Response(ActionResponse {
            action,
            code,
            receive_time,
        }));
    }
}

impl EventSource for ReplaySource {
    fn next_event(&mut self) -> Option<Event> {
        let event = self.queue.pop()?.event;
        if let Event::OwnTrade(trade) = &event {
            self.live_orders.remove(&trade.client_order_id);
        }
        self.delivered += 1;
        Some(event)
    }

    fn submit_order(&mut self, order: &Order) {
        let id = order.client_order_id;
        let code = if self.rejected_ids.contains(&id) {
            ResponseCode::Rejected
        } else {
            self.live_orders.insert(id);
            ResponseCode::Ok
        };
        debug!(order_id = id, code = %code, "Stub accepted order submission");

        self.submitted_orders.push(order.clone());
        self.respond(Action::Place(order.clone()), code, order.creation_time);
    }

    fn submit_cancel(&mut self, cancel: &OrderCancelRequest) {
        let id = cancel.client_order_id;
        let code = if self.live_orders.remove(&id) {
            ResponseCode::Ok
        } else {
            ResponseCode::NotFound
        };
        debug!(order_id = id, code = %code, "Stub accepted cancel submission");

        self.submitted_cancels.push(cancel.clone());
        self.respond(Action::Cancel(cancel.clone()), code, cancel.request_time);
    }

    fn name(&self) -> &'static str {
        "Replay"
    }
}
