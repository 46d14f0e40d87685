//! Market data types delivered by the exchange simulator.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::{Nanos, Side};

/// A single (price, size) level of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Level price.
    pub price: Decimal,
    /// Resting size at this price.
    pub size: Decimal,
}

impl PriceLevel {
    /// Create a new price level.
    #[must_use]
    pub const fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Full order book snapshot, levels ordered best to worst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderbookSnapshot {
    /// Bid levels, highest price first.
    pub bids: Vec<PriceLevel>,
    /// Ask levels, lowest price first.
    pub asks: Vec<PriceLevel>,
    /// Time the snapshot reached the strategy.
    pub receive_time: Nanos,
}

impl OrderbookSnapshot {
    /// Best bid level, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Best ask level, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Top-of-book level on the given side.
    #[must_use]
    pub fn best(&self, side: Side) -> Option<&PriceLevel> {
        match side {
            Side::Bid => self.best_bid(),
            Side::Ask => self.best_ask(),
        }
    }
}

/// Public trade print. Never one of our own fills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicTrade {
    /// Aggressor side.
    pub side: Side,
    /// Trade size.
    pub size: Decimal,
    /// Trade price.
    pub price: Decimal,
    /// Time the print reached the strategy.
    pub receive_time: Nanos,
}

/// Market data update. Exactly one payload per instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketUpdate {
    /// Order book snapshot.
    Orderbook(OrderbookSnapshot),
    /// Public trade.
    Trade(PublicTrade),
    /// Heartbeat or any other update without payload.
    Heartbeat {
        /// Time the update reached the strategy.
        receive_time: Nanos,
    },
}

impl MarketUpdate {
    /// Receive time of the update.
    #[must_use]
    pub const fn receive_time(&self) -> Nanos {
        match self {
            Self::Orderbook(book) => book.receive_time,
            Self::Trade(trade) => trade.receive_time,
            Self::Heartbeat { receive_time } => *receive_time,
        }
    }
}

impl fmt::Display for MarketUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orderbook(book) => {
                write!(f, "Orderbook(receive_time={}, bids=[", book.receive_time)?;
                write_levels(f, &book.bids)?;
                write!(f, "], asks=[")?;
                write_levels(f, &book.asks)?;
                write!(f, "])")
            }
            Self::Trade(trade) => write!(
                f,
                "Trade(side={}, size={}, price={}, receive_time={})",
                trade.side, trade.size, trade.price, trade.receive_time
            ),
            Self::Heartbeat { receive_time } => {
                write!(f, "Heartbeat(receive_time={receive_time})")
            }
        }
    }
}

fn write_levels(f: &mut fmt::Formatter<'_>, levels: &[PriceLevel]) -> fmt::Result {
    for (i, level) in levels.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "({}, {})", level.price, level.size)?;
    }
    Ok(())
}
