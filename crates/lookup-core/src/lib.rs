//! # lookup-core
//!
//! Core types for the multi-lookup batch resolver.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! Threads, files, logs and the system resolver live in `lookup-runtime`.
//!
//! ## Modules
//!
//! - `buffer` - Bounded buffer between requesters and resolvers
//! - `shutdown` - One-way "no more input" latch and producer join proof
//! - `resolve` - Name resolution trait and outcome type
//! - `record` - Statistics and result log line formats
//! - `error` - Error types
//! - `env` - Environment variable utilities

pub mod buffer;
pub mod shutdown;
pub mod resolve;
pub mod record;
pub mod error;
pub mod env;

// Re-exports for convenience
pub use buffer::{BoundedBuffer, BufferStats};
pub use shutdown::{join_producers, ProducersJoined};
pub use resolve::{Resolution, Resolve};
pub use record::{ResultRecord, StatsRecord};
pub use error::{LookupError, PushError, Result};
pub use env::{env_get, env_get_opt};

/// Limits and defaults shared by every layer
pub mod constants {
    /// Longest accepted input line in bytes, exclusive.
    ///
    /// A line of this length or more is rejected as malformed.
    pub const MAX_LINE_LENGTH: usize = 1025;

    /// Default number of slots in the bounded buffer
    pub const DEFAULT_BUFFER_CAPACITY: usize = 16;

    /// Upper bound on requester threads
    pub const MAX_REQUESTER_THREADS: usize = 10;

    /// Upper bound on resolver threads
    pub const MAX_RESOLVER_THREADS: usize = 10;

    /// Upper bound on input files
    pub const MAX_INPUT_FILES: usize = 10;

    /// Room for the longest textual IPv6 address plus terminator (INET6_ADDRSTRLEN)
    pub const MAX_ADDRESS_LENGTH: usize = 46;

    /// Written in place of an address when resolution fails
    pub const FAILURE_MARKER: &str = "";
}
