//! Serialized log sinks
//!
//! The requester log and the resolver log each get their own lock, separate
//! from the buffer lock and from each other. A failed write never takes a
//! worker down: the first error is kept, later appends are dropped, and the
//! error is reported by `finish()` once every worker has been joined.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use log::error;
use parking_lot::Mutex;
use lookup_core::{LookupError, Result};

/// Append-only, line-oriented writer shared between threads
pub struct LogSink<W> {
    /// "requester" or "resolver", for diagnostics
    kind: &'static str,
    inner: Mutex<SinkState<W>>,
}

struct SinkState<W> {
    writer: W,
    lines: u64,
    error: Option<io::Error>,
}

impl LogSink<BufWriter<File>> {
    /// Create (truncate) a log file
    pub fn create(kind: &'static str, path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| LookupError::OpenLog {
            kind,
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(kind, BufWriter::new(file)))
    }
}

impl<W: Write + Send> LogSink<W> {
    pub fn new(kind: &'static str, writer: W) -> Self {
        Self {
            kind,
            inner: Mutex::new(SinkState { writer, lines: 0, error: None }),
        }
    }

    /// Write one record followed by a newline
    ///
    /// Returns `false` if the line was not written.
    pub fn append<R: Display + ?Sized>(&self, record: &R) -> bool {
        let mut state = self.inner.lock();
        if state.error.is_some() {
            return false;
        }
        match writeln!(state.writer, "{record}") {
            Ok(()) => {
                state.lines += 1;
                true
            }
            Err(err) => {
                error!("{} log write failed, dropping further records: {}", self.kind, err);
                state.error = Some(err);
                false
            }
        }
    }

    /// Lines written so far
    pub fn lines(&self) -> u64 {
        self.inner.lock().lines
    }

    /// Flush and hand back the writer, or the first write error
    pub fn finish(self) -> Result<W> {
        let kind = self.kind;
        let mut state = self.inner.into_inner();
        if let Some(source) = state.error {
            return Err(LookupError::LogWrite { kind, source });
        }
        state.writer.flush().map_err(|source| LookupError::LogWrite { kind, source })?;
        Ok(state.writer)
    }
}
