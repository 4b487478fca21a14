//! Library defaults
//!
//! Overridden at runtime by the `MLOOKUP_*` environment variables read in
//! `LookupConfig::from_env`.

use lookup_core::constants;
use crate::dns::AddressFamily;

/// Requester threads when none are requested
pub const REQUESTERS: usize = 1;

/// Resolver threads when none are requested
pub const RESOLVERS: usize = 1;

/// Slots in the bounded buffer
pub const BUFFER_CAPACITY: usize = constants::DEFAULT_BUFFER_CAPACITY;

/// Lines this long or longer are skipped
pub const MAX_LINE_LENGTH: usize = constants::MAX_LINE_LENGTH;

/// Address family asked of the system resolver
pub const ADDRESS_FAMILY: AddressFamily = AddressFamily::V4;
