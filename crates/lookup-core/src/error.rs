//! Error types for multi-lookup
//!
//! Only configuration and setup problems are errors. Malformed lines and
//! failed lookups are ordinary outcomes and never surface here.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for multi-lookup operations
pub type Result<T> = std::result::Result<T, LookupError>;

/// Errors that stop a run, either before any worker starts or once all
/// workers have been joined
#[derive(Error, Debug)]
pub enum LookupError {
    /// Thread or file count outside the accepted range
    #[error("invalid number of {what}: {value} (must be between {min} and {max})")]
    CountOutOfRange {
        /// What was counted ("requesters", "resolvers", "input files")
        what: &'static str,
        /// The rejected value
        value: usize,
        /// Smallest accepted value
        min: usize,
        /// Largest accepted value
        max: usize,
    },

    /// Invalid tuning parameter
    #[error("invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: &'static str,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// An input file could not be opened
    #[error("input file {} could not be opened: {source}", .path.display())]
    OpenInput {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A log file could not be created
    #[error("invalid {kind} log {}: {source}", .path.display())]
    OpenLog {
        /// "requester" or "resolver"
        kind: &'static str,
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A worker thread could not be started
    #[error("failed to spawn {role} thread {id}: {source}")]
    Spawn {
        /// Pool the thread belonged to
        role: &'static str,
        /// Index within the pool
        id: usize,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A worker thread panicked
    #[error("{role} thread {id} panicked: {message}")]
    WorkerPanicked {
        /// Pool the thread belonged to
        role: &'static str,
        /// Index within the pool
        id: usize,
        /// Panic payload, if it was a string
        message: String,
    },

    /// Writing a log failed
    #[error("failed to write {kind} log: {source}")]
    LogWrite {
        /// "requester" or "resolver"
        kind: &'static str,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Returned by `BoundedBuffer::push` once the buffer is shut down.
///
/// Carries the rejected item back to the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct PushError<T>(pub T);

impl<T> PushError<T> {
    /// Take back the item that was not pushed
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PushError(..)")
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "push on a buffer that was shut down")
    }
}

impl<T> std::error::Error for PushError<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_out_of_range() {
        let error = LookupError::CountOutOfRange { what: "resolvers", value: 11, min: 1, max: 10 };
        let msg = error.to_string();
        assert!(msg.contains("invalid number of resolvers: 11"));
        assert!(msg.contains("between 1 and 10"));
    }

    #[test]
    fn test_open_input_keeps_source() {
        let error = LookupError::OpenInput {
            path: PathBuf::from("names1.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(error.to_string().contains("names1.txt"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_push_error_returns_item() {
        let err = PushError(String::from("a.com"));
        assert_eq!(format!("{err:?}"), "PushError(..)");
        assert_eq!(err.into_inner(), "a.com");
    }
}
