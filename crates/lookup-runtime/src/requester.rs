//! Requester (producer) threads
//!
//! A requester walks the input files round-robin, starting at its own index,
//! and pushes every non-blank line into the bounded buffer. `push` blocks
//! while the buffer is full, which bounds memory no matter how large the
//! inputs are. When done it appends one statistics line to the requester log.
//!
//! A line is blank when nothing is left after removing one `\n` or `\r\n`
//! terminator, so LF and CRLF inputs are accounted identically. Blank lines
//! are counted but never pushed.

use std::io::Write;
use log::{debug, error, trace};
use lookup_core::{BoundedBuffer, StatsRecord};
use crate::input::InputFile;
use crate::sink::LogSink;

/// What one requester serviced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequesterStats {
    /// Requester index
    pub id: usize,
    /// Files this requester pushed at least one line from
    pub files_serviced: usize,
    /// Lines this requester pushed
    pub lines_serviced: usize,
    /// Blank lines read and dropped
    pub blank_lines: usize,
}

impl RequesterStats {
    /// The requester log line for these totals
    pub fn record(&self) -> StatsRecord {
        StatsRecord {
            thread: self.id,
            files: self.files_serviced,
            lines: self.lines_serviced,
        }
    }
}

/// Round-robin cursor over the shared file list
///
/// Starts at `requester % file_count` and yields every file index exactly once.
#[derive(Debug, Clone)]
pub struct Assignment {
    next: usize,
    remaining: usize,
    file_count: usize,
}

impl Assignment {
    pub fn round_robin(requester: usize, file_count: usize) -> Self {
        Self {
            next: if file_count == 0 { 0 } else { requester % file_count },
            remaining: file_count,
            file_count,
        }
    }
}

impl Iterator for Assignment {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.next = (current + 1) % self.file_count;
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Assignment {}

/// Requester thread body
pub fn run_requester<W: Write + Send>(
    id: usize,
    files: &[InputFile],
    buffer: &BoundedBuffer<String>,
    stats_log: &LogSink<W>,
) -> RequesterStats {
    let mut stats = RequesterStats { id, ..Default::default() };

    for index in Assignment::round_robin(id, files.len()) {
        let file = &files[index];
        let drained = drain_file(file, buffer);

        if drained.lines > 0 {
            stats.files_serviced += 1;
            stats.lines_serviced += drained.lines;
        }
        stats.blank_lines += drained.blank;
        debug!("{}: pushed {} lines, dropped {} blank", file.name(), drained.lines, drained.blank);

        if drained.buffer_closed {
            error!("buffer shut down while requester {id} was still reading; stopping early");
            break;
        }
    }

    stats_log.append(&stats.record());
    stats
}

/// Check if nothing but a `\r` remains once `\n` was removed
pub fn is_blank(line: &str) -> bool {
    line.is_empty() || line == "\r"
}

struct Drained {
    lines: usize,
    blank: usize,
    buffer_closed: bool,
}

fn drain_file(file: &InputFile, buffer: &BoundedBuffer<String>) -> Drained {
    let mut drained = Drained { lines: 0, blank: 0, buffer_closed: false };
    while let Some(line) = file.next_line() {
        if is_blank(&line) {
            trace!("{}: skipping blank line", file.name());
            drained.blank += 1;
            continue;
        }
        if let Err(rejected) = buffer.push(line) {
            error!("dropping {:?}: buffer is shut down", rejected.into_inner());
            drained.buffer_closed = true;
            break;
        }
        drained.lines += 1;
    }
    drained
}
