//! Event source error types.

use thiserror::Error;

/// Errors raised while loading a recorded event stream.
#[derive(Debug, Error)]
pub enum SourceError {
    /// IO error reading the stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be decoded as an event.
    #[error("Invalid event on line {line}: {source}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}
