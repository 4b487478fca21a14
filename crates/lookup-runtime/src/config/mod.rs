//! Lookup configuration
//!
//! Provides compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder calls (command-line values)
//! 2. Environment variables
//! 3. Library defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use lookup_runtime::config::LookupConfig;
//!
//! let config = LookupConfig::from_env()
//!     .requesters(5)
//!     .resolvers(10);
//! config.validate(3)?;
//! ```

pub mod defaults;

use lookup_core::constants::{MAX_INPUT_FILES, MAX_REQUESTER_THREADS, MAX_RESOLVER_THREADS};
use lookup_core::env::env_get;
use lookup_core::{LookupError, Result};
use crate::dns::AddressFamily;

/// Run configuration with builder pattern.
///
/// Use `from_env()` to start with library defaults and apply any
/// environment variable overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Number of requester (producer) threads
    pub requesters: usize,
    /// Number of resolver (consumer) threads
    pub resolvers: usize,
    /// Slots in the bounded buffer
    pub buffer_capacity: usize,
    /// Lines of this many bytes or more are skipped
    pub max_line_length: usize,
    /// Address family asked of the system resolver
    pub address_family: AddressFamily,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl LookupConfig {
    /// Create config from library defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `MLOOKUP_BUFFER_CAPACITY` - Slots in the bounded buffer
    /// - `MLOOKUP_MAX_LINE_LENGTH` - Reject lines of this many bytes or more
    /// - `MLOOKUP_ADDRESS_FAMILY` - `any`, `ipv4` or `ipv6`
    ///
    /// Thread counts come from the command line, not the environment.
    pub fn from_env() -> Self {
        Self {
            requesters: defaults::REQUESTERS,
            resolvers: defaults::RESOLVERS,
            buffer_capacity: env_get("MLOOKUP_BUFFER_CAPACITY", defaults::BUFFER_CAPACITY),
            max_line_length: env_get("MLOOKUP_MAX_LINE_LENGTH", defaults::MAX_LINE_LENGTH),
            address_family: env_get("MLOOKUP_ADDRESS_FAMILY", defaults::ADDRESS_FAMILY),
        }
    }

    /// Create config with explicit defaults (no env override).
    /// Useful for testing or when you want full control.
    pub fn new() -> Self {
        Self {
            requesters: defaults::REQUESTERS,
            resolvers: defaults::RESOLVERS,
            buffer_capacity: defaults::BUFFER_CAPACITY,
            max_line_length: defaults::MAX_LINE_LENGTH,
            address_family: defaults::ADDRESS_FAMILY,
        }
    }

    // Builder methods

    pub fn requesters(mut self, n: usize) -> Self {
        self.requesters = n;
        self
    }

    pub fn resolvers(mut self, n: usize) -> Self {
        self.resolvers = n;
        self
    }

    pub fn buffer_capacity(mut self, cap: usize) -> Self {
        self.buffer_capacity = cap;
        self
    }

    pub fn max_line_length(mut self, len: usize) -> Self {
        self.max_line_length = len;
        self
    }

    pub fn address_family(mut self, family: AddressFamily) -> Self {
        self.address_family = family;
        self
    }

    /// Check every bound before any thread starts.
    pub fn validate(&self, input_files: usize) -> Result<()> {
        check_count("requesters", self.requesters, MAX_REQUESTER_THREADS)?;
        check_count("resolvers", self.resolvers, MAX_RESOLVER_THREADS)?;
        check_count("input files", input_files, MAX_INPUT_FILES)?;

        if self.buffer_capacity == 0 {
            return Err(LookupError::InvalidParameter {
                parameter: "buffer_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        // One byte of hostname plus the terminator slot
        if self.max_line_length < 2 {
            return Err(LookupError::InvalidParameter {
                parameter: "max_line_length",
                reason: format!("{} leaves no room for a hostname", self.max_line_length),
            });
        }
        Ok(())
    }
}

fn check_count(what: &'static str, value: usize, max: usize) -> Result<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(LookupError::CountOutOfRange { what, value, min: 1, max })
    }
}
