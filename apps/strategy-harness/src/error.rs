//! Fatal strategy errors.
//!
//! Only two conditions stop a run: a ledger invariant violation and a journal
//! that cannot be opened at startup. Everything else (unknown fills, rejected
//! placements, cancels racing fills, lost journal lines) is handled where it
//! is detected and counted in the run summary.

use std::path::PathBuf;

use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors that abort a strategy run.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Ledger invariant violated (id generation bug).
    #[error("Ledger invariant violated: {0}")]
    Ledger(#[from] LedgerError),

    /// Event journal could not be opened.
    #[error("Failed to open event journal {}: {source}", path.display())]
    JournalOpen {
        /// Journal file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
