//! Name resolution seam
//!
//! Resolvers treat the lookup itself as a black box. A failed lookup is an
//! ordinary outcome, not an error.

use crate::constants::FAILURE_MARKER;

/// Outcome of resolving one hostname
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Textual address
    Address(String),
    /// The name could not be resolved
    Failed,
}

impl Resolution {
    /// Text written to the result log: the address or the failure marker
    pub fn as_str(&self) -> &str {
        match self {
            Resolution::Address(addr) => addr,
            Resolution::Failed => FAILURE_MARKER,
        }
    }

    /// Check if the lookup failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Resolution::Failed)
    }
}

/// Hostname to address lookup
///
/// Implementations must not panic and must not block indefinitely; their
/// latency only affects throughput. `max_len` bounds the textual address,
/// terminator included, so an address needs at most `max_len - 1` bytes.
pub trait Resolve: Send + Sync {
    /// Resolve `hostname` to a single address
    fn resolve(&self, hostname: &str, max_len: usize) -> Resolution;
}

impl<F> Resolve for F
where
    F: Fn(&str, usize) -> Resolution + Send + Sync,
{
    fn resolve(&self, hostname: &str, max_len: usize) -> Resolution {
        self(hostname, max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_resolver() {
        let stub = |host: &str, _max: usize| {
            if host.ends_with(".com") {
                Resolution::Address("10.0.0.1".to_string())
            } else {
                Resolution::Failed
            }
        };
        assert_eq!(stub.resolve("a.com", 46).as_str(), "10.0.0.1");
        assert!(stub.resolve("a.invalid", 46).is_failed());
    }

    #[test]
    fn test_failed_uses_marker() {
        assert_eq!(Resolution::Failed.as_str(), FAILURE_MARKER);
    }
}
