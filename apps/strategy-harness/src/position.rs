//! Net position tracking in quote-asset terms.

use rust_decimal::Decimal;

use crate::models::Side;

/// Net signed exposure, mutated only by confirmed fills.
///
/// Bid fills add `size * price`, ask fills subtract it.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    exposure: Decimal,
    fills: u64,
}

impl PositionTracker {
    /// Create a flat tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            exposure: Decimal::ZERO,
            fills: 0,
        }
    }

    /// Apply a confirmed fill.
    pub fn apply_fill(&mut self, side: Side, size: Decimal, price: Decimal) {
        self.exposure += side.signed_notional(size, price);
        self.fills += 1;
    }

    /// Current signed exposure in quote-asset units.
    #[must_use]
    pub const fn exposure(&self) -> Decimal {
        self.exposure
    }

    /// Number of fills applied.
    #[must_use]
    pub const fn fill_count(&self) -> u64 {
        self.fills
    }
}
