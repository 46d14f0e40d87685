//! Run accounting and run-level logging.
//!
//! # Log Levels
//!
//! - **INFO**: run start and end
//! - **WARN**: placement rejections, clock regressions, journal write failures
//! - **DEBUG**: per-order steps

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::models::Nanos;

/// Counters accumulated over one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run identifier.
    pub run_id: Uuid,
    /// Events pulled from the source.
    pub events_processed: u64,
    /// Order book snapshots seen.
    pub snapshots: u64,
    /// Orders placed.
    pub orders_placed: u64,
    /// Placements acknowledged OK.
    pub orders_confirmed: u64,
    /// Placements answered with a non-OK code.
    pub placements_rejected: u64,
    /// Fills for orders still in the ledger.
    pub fills: u64,
    /// Fills for ids absent from the ledger.
    pub unknown_fills: u64,
    /// Cancels issued by lifetime sweeps.
    pub cancels_issued: u64,
    /// Cancels answered with `NOT_FOUND`.
    pub cancel_not_found: u64,
    /// Lost journal lines.
    pub journal_write_failures: u64,
    /// Orders still in the ledger at end of stream.
    pub outstanding_at_end: usize,
    /// Net exposure at end of stream.
    pub final_position: Decimal,
    /// Strategy clock at end of stream.
    pub final_time: Nanos,
}

impl RunSummary {
    /// Create a zeroed summary with a fresh run id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_run_id(Uuid::new_v4())
    }

    /// Create a zeroed summary for the given run id.
    #[must_use]
    pub const fn with_run_id(run_id: Uuid) -> Self {
        Self {
            run_id,
            events_processed: 0,
            snapshots: 0,
            orders_placed: 0,
            orders_confirmed: 0,
            placements_rejected: 0,
            fills: 0,
            unknown_fills: 0,
            cancels_issued: 0,
            cancel_not_found: 0,
            journal_write_failures: 0,
            outstanding_at_end: 0,
            final_position: Decimal::ZERO,
            final_time: 0,
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Log run start.
pub fn log_run_start(
    run_id: Uuid,
    source: &str,
    max_position: Decimal,
    order_lifetime_ns: Nanos,
) {
    info!(
        run_id = %run_id,
        source = source,
        max_position = %max_position,
        order_lifetime_ns = order_lifetime_ns,
        "Strategy run started"
    );
}

/// Log run end.
pub fn log_run_end(summary: &RunSummary) {
    info!(
        run_id = %summary.run_id,
        events_processed = summary.events_processed,
        snapshots = summary.snapshots,
        orders_placed = summary.orders_placed,
        orders_confirmed = summary.orders_confirmed,
        placements_rejected = summary.placements_rejected,
        fills = summary.fills,
        unknown_fills = summary.unknown_fills,
        cancels_issued = summary.cancels_issued,
        cancel_not_found = summary.cancel_not_found,
        journal_write_failures = summary.journal_write_failures,
        outstanding_at_end = summary.outstanding_at_end,
        final_position = %summary.final_position,
        final_time = summary.final_time,
        "Strategy run completed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_summary_is_zeroed() {
        let summary = RunSummary::new();
        assert_eq!(summary.events_processed, 0);
        assert_eq!(summary.final_position, Decimal::ZERO);
        assert_ne!(summary.run_id, RunSummary::new().run_id);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary::with_run_id(Uuid::nil());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["run_id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["orders_placed"], 0);
    }
}
