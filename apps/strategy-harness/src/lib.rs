// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::cast_possible_truncation
    )
)]

//! Strategy Harness - Order Lifecycle Core
//!
//! Decision and order-management layer of an event-driven backtest harness.
//! Consumes a time-ordered stream of market and execution events, keeps the
//! authoritative view of outstanding orders and net position, quotes under a
//! position bound, and cancels orders that outlive their lifetime.
//!
//! # Modules
//!
//! - `models`: events, orders, fills and book snapshots
//! - `ledger`: outstanding orders, id generation, lifetime enforcement
//! - `position`: net signed exposure
//! - `policy`: top-of-book quoting policy and its side source
//! - `source`: exchange-simulation contract and the in-memory replay stub
//! - `strategy`: event loop, strategy context and run accounting
//! - `journal`: per-run event log
//! - `config`, `telemetry`, `error`: ambient plumbing
//!
//! Everything runs on the caller's thread. The event loop owns all state and
//! processes events in the order the source delivers them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod journal;
pub mod ledger;
pub mod models;
pub mod policy;
pub mod position;
pub mod source;
pub mod strategy;
pub mod telemetry;

pub use config::{ConfigError, HarnessConfig, StrategyConfig, load_config, load_config_from_string};
pub use error::StrategyError;
pub use journal::EventJournal;
pub use ledger::{LedgerError, LifecycleManager, OrderIdGenerator, OrderLedger, OrderState};
pub use models::{
    Action, ActionResponse, ClientOrderId, Event, MarketUpdate, Nanos, Order, OrderCancelRequest,
    OrderbookSnapshot, OwnTrade, PriceLevel, PublicTrade, ResponseCode, Side,
};
pub use policy::{
    FixedSide, Quote, QuoteDecision, QuotePolicyConfig, QuotingPolicy, RandomSide, SideChooser,
    SkipReason,
};
pub use position::PositionTracker;
pub use source::{EventSource, ReplaySource, ReplaySourceConfig, SourceError};
pub use strategy::{RunSummary, Strategy, StrategyClock, StrategyContext};
