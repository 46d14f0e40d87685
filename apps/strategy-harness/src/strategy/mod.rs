//! Event loop.
//!
//! Pulls one event at a time from the [`EventSource`], journals it, moves the
//! clock, dispatches by event kind and then runs the lifetime sweep. The loop
//! ends when the source is exhausted.
//!
//! | Event | Effect |
//! |-------|--------|
//! | Order book snapshot | cache book, evaluate quoting policy |
//! | Public trade, heartbeat | clock only |
//! | Own trade | remove order from ledger, apply fill to position |
//! | Place ack `OK` | mark order outstanding |
//! | Place ack other | drop order from ledger |
//! | Cancel ack | logged only, removal already happened at sweep time |

mod context;
mod summary;

use rand::rngs::StdRng;
use tracing::{debug, error, warn};

pub use context::{StrategyClock, StrategyContext};
pub use summary::{RunSummary, log_run_end, log_run_start};

use crate::config::{HarnessConfig, StrategyConfig};
use crate::error::StrategyError;
use crate::journal::EventJournal;
use crate::models::{Action, ActionResponse, Event, MarketUpdate, OwnTrade, ResponseCode};
use crate::policy::{QuoteDecision, QuotingPolicy, RandomSide, SideChooser, SkipReason};
use crate::source::EventSource;

/// A strategy instance bound to one event source.
#[derive(Debug)]
pub struct Strategy<S, C> {
    source: S,
    policy: QuotingPolicy<C>,
    context: StrategyContext,
    journal: Option<EventJournal>,
    summary: RunSummary,
}

impl<S: EventSource> Strategy<S, RandomSide<StdRng>> {
    /// Build a strategy from loaded configuration and open its journal.
    ///
    /// # Errors
    ///
    /// Returns `StrategyError::JournalOpen` if the journal cannot be opened.
    pub fn from_config(config: &HarnessConfig, source: S) -> Result<Self, StrategyError> {
        let chooser = config
            .quoting
            .seed
            .map_or_else(RandomSide::from_entropy, RandomSide::seeded);
        let policy = QuotingPolicy::new(
            config.quoting.clone(),
            config.strategy.max_position,
            chooser,
        );
        let journal = EventJournal::open(&config.journal.directory)?;

        Ok(Self::new(config.strategy.clone(), policy, source).with_journal(journal))
    }
}

impl<S: EventSource, C: SideChooser> Strategy<S, C> {
    /// Create a strategy without a journal.
    #[must_use]
    pub fn new(config: StrategyConfig, policy: QuotingPolicy<C>, source: S) -> Self {
        Self {
            source,
            policy,
            context: StrategyContext::new(config),
            journal: None,
            summary: RunSummary::new(),
        }
    }

    /// Attach an event journal.
    #[must_use]
    pub fn with_journal(mut self, journal: EventJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Drive the loop until the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `StrategyError::Ledger` on a ledger invariant violation. The
    /// journal is flushed on both the success and the error path.
    pub fn run(&mut self) -> Result<RunSummary, StrategyError> {
        log_run_start(
            self.summary.run_id,
            self.source.name(),
            self.context.config.max_position,
            self.context.config.order_lifetime_ns,
        );

        while let Some(event) = self.source.next_event() {
            if let Err(e) = self.handle_event(event) {
                self.finish_journal();
                error!(
                    run_id = %self.summary.run_id,
                    error = %e,
                    current_time = self.context.now(),
                    "Strategy run aborted"
                );
                return Err(e);
            }
        }

        self.finish_journal();
        let summary = self.summary();
        log_run_end(&summary);
        Ok(summary)
    }

    /// Process a single event: journal, clock, dispatch, lifetime sweep.
    ///
    /// # Errors
    ///
    /// Returns `StrategyError::Ledger` on a ledger invariant violation.
    pub fn handle_event(&mut self, event: Event) -> Result<(), StrategyError> {
        self.summary.events_processed += 1;
        if let Some(journal) = self.journal.as_mut() {
            journal.record(&event);
        }
        self.context.clock.advance(event.timestamp());

        match event {
            Event::Market(MarketUpdate::Orderbook(book)) => {
                self.summary.snapshots += 1;
                self.context.book = Some(book);
                self.quote()?;
            }
            Event::Market(MarketUpdate::Trade(_) | MarketUpdate::Heartbeat { .. }) => {}
            Event::OwnTrade(trade) => self.on_own_trade(&trade),
            Event::Response(response) => self.on_response(&response),
        }

        self.expire_orders();
        Ok(())
    }

    fn quote(&mut self) -> Result<(), StrategyError> {
        let Some(book) = self.context.book.as_ref() else {
            return Ok(());
        };

        let decision = self.policy.decide(
            book,
            self.context.position.exposure(),
            self.context.clock.now(),
            &self.context.ledger,
        );

        match decision {
            QuoteDecision::Place(quote) => {
                let order = quote.into_order(self.context.ids.next_id());
                self.context.ledger.register(order.clone())?;
                debug!(
                    order_id = order.client_order_id,
                    side = %order.side,
                    price = %order.price,
                    size = %order.size,
                    creation_time = order.creation_time,
                    "Order placed"
                );
                self.source.submit_order(&order);
                self.summary.orders_placed += 1;
            }
            QuoteDecision::Skip(SkipReason::EmptyBookSide(side)) => {
                warn!(
                    side = %side,
                    current_time = self.context.now(),
                    "Order book side empty, no quote placed"
                );
            }
            QuoteDecision::Skip(SkipReason::SideOutstanding(_)) => {}
        }
        Ok(())
    }

    fn on_own_trade(&mut self, trade: &OwnTrade) {
        if self.context.ledger.remove(trade.client_order_id).is_some() {
            self.summary.fills += 1;
        } else {
            self.summary.unknown_fills += 1;
            debug!(
                order_id = trade.client_order_id,
                "Fill for order not in ledger"
            );
        }

        self.context
            .position
            .apply_fill(trade.side, trade.size, trade.price);
        debug!(
            order_id = trade.client_order_id,
            side = %trade.side,
            size = %trade.size,
            price = %trade.price,
            position = %self.context.position.exposure(),
            "Fill applied"
        );
    }

    fn on_response(&mut self, response: &ActionResponse) {
        let id = response.action.client_order_id();
        match (&response.action, response.code) {
            (Action::Place(_), ResponseCode::Ok) => {
                self.summary.orders_confirmed += 1;
                if !self.context.ledger.confirm(id) {
                    debug!(order_id = id, "Acknowledged order already terminal");
                }
            }
            (Action::Place(_), code) => {
                self.summary.placements_rejected += 1;
                self.context.ledger.remove(id);
                warn!(order_id = id, code = %code, "Order placement rejected");
            }
            (Action::Cancel(_), ResponseCode::NotFound) => {
                self.summary.cancel_not_found += 1;
                debug!(order_id = id, "Cancel target not found at exchange");
            }
            (Action::Cancel(_), code) => {
                debug!(order_id = id, code = %code, "Cancel acknowledged");
            }
        }
    }

    fn expire_orders(&mut self) {
        let now = self.context.now();
        let cancels = self
            .context
            .lifecycle
            .expire(&mut self.context.ledger, now);

        for cancel in &cancels {
            self.source.submit_cancel(cancel);
        }
        self.summary.cancels_issued += cancels.len() as u64;
    }

    fn finish_journal(&mut self) {
        if let Some(journal) = self.journal.as_mut() {
            journal.finish();
        }
    }

    /// Snapshot of the run counters and end state.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            journal_write_failures: self
                .journal
                .as_ref()
                .map_or(0, EventJournal::write_failures),
            outstanding_at_end: self.context.ledger.len(),
            final_position: self.context.position.exposure(),
            final_time: self.context.now(),
            ..self.summary.clone()
        }
    }

    /// Strategy state.
    #[must_use]
    pub const fn context(&self) -> &StrategyContext {
        &self.context
    }

    /// Mutable strategy state.
    pub const fn context_mut(&mut self) -> &mut StrategyContext {
        &mut self.context
    }

    /// Event source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Mutable event source.
    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Attached journal, if any.
    #[must_use]
    pub const fn journal(&self) -> Option<&EventJournal> {
        self.journal.as_ref()
    }
}
