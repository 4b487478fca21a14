//! System name resolution
//!
//! `SystemResolver` asks the platform resolver for a hostname and keeps the
//! first address of the configured family.
//! Platform-specific implementations use the most direct primitive available.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use log::debug;
use lookup_core::{Resolution, Resolve};

/// Address family requested from the platform resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    /// Whatever the resolver returns first
    Any,
    /// IPv4 only
    V4,
    /// IPv6 only
    V6,
}

impl AddressFamily {
    /// Check if `ip` belongs to this family
    pub fn accepts(&self, ip: &IpAddr) -> bool {
        match self {
            AddressFamily::Any => true,
            AddressFamily::V4 => ip.is_ipv4(),
            AddressFamily::V6 => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressFamily::Any => "any",
            AddressFamily::V4 => "ipv4",
            AddressFamily::V6 => "ipv6",
        })
    }
}

/// Unrecognised address family name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFamilyError(String);

impl fmt::Display for ParseFamilyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown address family '{}' (expected any, ipv4 or ipv6)", self.0)
    }
}

impl std::error::Error for ParseFamilyError {}

impl FromStr for AddressFamily {
    type Err = ParseFamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" | "unspec" => Ok(AddressFamily::Any),
            "ipv4" | "v4" | "inet" => Ok(AddressFamily::V4),
            "ipv6" | "v6" | "inet6" => Ok(AddressFamily::V6),
            _ => Err(ParseFamilyError(s.to_string())),
        }
    }
}

// Platform-specific implementations
cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod getaddrinfo;
        use getaddrinfo::lookup_first;
    } else {
        mod fallback;
        use fallback::lookup_first;
    }
}

/// Resolver backed by the operating system
#[derive(Debug, Clone, Copy)]
pub struct SystemResolver {
    family: AddressFamily,
}

impl SystemResolver {
    pub fn new(family: AddressFamily) -> Self {
        Self { family }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }
}

impl Resolve for SystemResolver {
    fn resolve(&self, hostname: &str, max_len: usize) -> Resolution {
        let Some(ip) = lookup_first(hostname, self.family) else {
            return Resolution::Failed;
        };

        let text = ip.to_string();
        // max_len counts a terminator slot (INET6_ADDRSTRLEN style)
        if text.len() >= max_len {
            debug!("{hostname}: address {text} does not fit in {max_len} bytes");
            return Resolution::Failed;
        }
        Resolution::Address(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookup_core::constants::MAX_ADDRESS_LENGTH;

    #[test]
    fn test_family_parse() {
        assert_eq!("IPv4".parse::<AddressFamily>().unwrap(), AddressFamily::V4);
        assert_eq!("inet6".parse::<AddressFamily>().unwrap(), AddressFamily::V6);
        assert_eq!("any".parse::<AddressFamily>().unwrap(), AddressFamily::Any);
        assert!("ipx".parse::<AddressFamily>().is_err());
    }

    #[test]
    fn test_family_accepts() {
        let v4: IpAddr = "10.0.0.1".parse().unwrap();
        let v6: IpAddr = "::1".parse().unwrap();
        assert!(AddressFamily::V4.accepts(&v4));
        assert!(!AddressFamily::V4.accepts(&v6));
        assert!(AddressFamily::V6.accepts(&v6));
        assert!(AddressFamily::Any.accepts(&v4));
    }

    #[test]
    fn test_numeric_hosts_resolve_locally() {
        let v4 = SystemResolver::new(AddressFamily::V4);
        assert_eq!(
            v4.resolve("127.0.0.1", MAX_ADDRESS_LENGTH),
            Resolution::Address("127.0.0.1".into())
        );

        let v6 = SystemResolver::new(AddressFamily::V6);
        assert_eq!(v6.resolve("::1", MAX_ADDRESS_LENGTH), Resolution::Address("::1".into()));
    }

    #[test]
    fn test_wrong_family_fails() {
        let v4 = SystemResolver::new(AddressFamily::V4);
        assert!(v4.resolve("::1", MAX_ADDRESS_LENGTH).is_failed());
    }

    #[test]
    fn test_nul_byte_fails() {
        let resolver = SystemResolver::new(AddressFamily::Any);
        assert!(resolver.resolve("exa\0mple.com", MAX_ADDRESS_LENGTH).is_failed());
    }

    #[test]
    fn test_address_must_fit() {
        let resolver = SystemResolver::new(AddressFamily::V4);
        // "127.0.0.1" is 9 bytes and needs a 10th for the terminator
        assert!(resolver.resolve("127.0.0.1", 9).is_failed());
        assert!(!resolver.resolve("127.0.0.1", 10).is_failed());
    }
}
