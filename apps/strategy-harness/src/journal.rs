//! Append-only per-run event journal.
//!
//! One human-readable line per processed event, in process order. The file
//! is opened once per run and named after the run start time:
//! `strategy-<dd.mm.yyyy-HH:MM:SS>.log`.
//!
//! Opening is the only fatal step. Write failures during the run are logged
//! and counted so a lost line never aborts a backtest.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::error::StrategyError;
use crate::models::Event;

/// Journal filename timestamp format.
const FILE_TIMESTAMP_FORMAT: &str = "%d.%m.%Y-%H:%M:%S";

/// Buffered event journal, flushed on [`EventJournal::finish`] or drop.
pub struct EventJournal {
    path: PathBuf,
    writer: Box<dyn Write>,
    lines_written: u64,
    write_failures: u64,
}

impl std::fmt::Debug for EventJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventJournal")
            .field("path", &self.path)
            .field("lines_written", &self.lines_written)
            .field("write_failures", &self.write_failures)
            .finish_non_exhaustive()
    }
}

impl EventJournal {
    /// Open a new journal in `directory`, named with the current local time.
    ///
    /// # Errors
    ///
    /// Returns `StrategyError::JournalOpen` if the directory or file cannot
    /// be created.
    pub fn open(directory: &Path) -> Result<Self, StrategyError> {
        Self::open_at(directory, Local::now())
    }

    /// Open a new journal in `directory`, named with the given start time.
    ///
    /// # Errors
    ///
    /// Returns `StrategyError::JournalOpen` if the directory or file cannot
    /// be created.
    pub fn open_at(directory: &Path, started_at: DateTime<Local>) -> Result<Self, StrategyError> {
        let path = directory.join(journal_file_name(started_at));

        let file = fs::create_dir_all(directory)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(&path))
            .map_err(|source| StrategyError::JournalOpen {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "Opened event journal");
        Ok(Self::with_writer(path, BufWriter::new(file)))
    }

    /// Journal over an arbitrary writer. `path` is only used in logs.
    #[must_use]
    pub fn with_writer(path: PathBuf, writer: impl Write + 'static) -> Self {
        Self {
            path,
            writer: Box::new(writer),
            lines_written: 0,
            write_failures: 0,
        }
    }

    /// Append one event line. Failures are reported, not returned.
    pub fn record(&mut self, event: &Event) {
        match writeln!(self.writer, "{event}") {
            Ok(()) => self.lines_written += 1,
            Err(e) => {
                self.write_failures += 1;
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    event_kind = event.kind(),
                    "Failed to write journal line"
                );
            }
        }
    }

    /// Flush buffered lines to disk.
    pub fn finish(&mut self) {
        if let Err(e) = self.writer.flush() {
            self.write_failures += 1;
            warn!(path = %self.path.display(), error = %e, "Failed to flush journal");
        }
    }

    /// Path of the journal file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines successfully written.
    #[must_use]
    pub const fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Write or flush failures so far.
    #[must_use]
    pub const fn write_failures(&self) -> u64 {
        self.write_failures
    }
}

impl Drop for EventJournal {
    fn drop(&mut self) {
        self.finish();
    }
}

/// File name for a journal started at `started_at`.
#[must_use]
pub fn journal_file_name(started_at: DateTime<Local>) -> String {
    format!("strategy-{}.log", started_at.format(FILE_TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{MarketUpdate, OwnTrade, Side};

    /// Writer whose every write and flush fails.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    fn started_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(
            journal_file_name(started_at()),
            "strategy-09.03.2024-14:05:07.log"
        );
    }

    #[test]
    fn test_records_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let mut journal = EventJournal::open_at(dir.path(), started_at()).unwrap();
            journal.record(&Event::Market(MarketUpdate::Heartbeat { receive_time: 3 }));
            journal.record(&Event::OwnTrade(OwnTrade {
                client_order_id: 1,
                side: Side::Bid,
                size: dec!(0.001),
                price: dec!(100),
                receive_time: 4,
            }));
            assert_eq!(journal.lines_written(), 2);
            assert_eq!(journal.write_failures(), 0);
            journal.path().to_path_buf()
        };

        let contents = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Heartbeat"));
        assert!(lines[1].starts_with("OwnTrade"));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("output").join("logs");

        let journal = EventJournal::open_at(&nested, started_at()).unwrap();

        assert!(nested.is_dir());
        assert!(journal.path().starts_with(&nested));
    }

    #[test]
    fn test_open_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();

        let result = EventJournal::open_at(&blocker, started_at());

        assert!(matches!(result, Err(StrategyError::JournalOpen { .. })));
    }

    #[test]
    fn test_write_failures_are_counted_not_returned() {
        let mut journal = EventJournal::with_writer(PathBuf::from("broken.log"), BrokenPipe);

        journal.record(&Event::Market(MarketUpdate::Heartbeat { receive_time: 1 }));
        journal.record(&Event::Market(MarketUpdate::Heartbeat { receive_time: 2 }));
        assert_eq!(journal.lines_written(), 0);
        assert_eq!(journal.write_failures(), 2);

        journal.finish();
        assert_eq!(journal.write_failures(), 3);
    }
}
