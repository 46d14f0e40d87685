//! Order ledger error types.

use thiserror::Error;

use crate::models::ClientOrderId;

/// Order ledger invariant violations.
///
/// These are fatal: they point at a bug in id generation, never at market
/// conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// An order with this id is already registered.
    #[error("duplicate client order id {0}: ledger already holds an order with this id")]
    DuplicateId(ClientOrderId),
}
