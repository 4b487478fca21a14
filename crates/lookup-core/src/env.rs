//! Typed environment overrides
//!
//! Every tunable reads `MLOOKUP_*` through these helpers; a value that is
//! unset, blank or unparsable leaves the built-in default in place.
//!
//! # Usage
//!
//! ```ignore
//! use lookup_core::env::{env_get, env_get_opt};
//!
//! let capacity: usize = env_get("MLOOKUP_BUFFER_CAPACITY", 16);
//! let family: Option<String> = env_get_opt("MLOOKUP_ADDRESS_FAMILY");
//! ```

use std::str::FromStr;

/// `key` parsed as `T`, or `default`
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// `key` parsed as `T` after trimming surrounding whitespace
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
