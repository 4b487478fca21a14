//! Fallback lookups through `std::net::ToSocketAddrs`
//!
//! Used on platforms without a libc resolver.

use std::net::{IpAddr, ToSocketAddrs};
use log::debug;
use super::AddressFamily;

/// First address of `family` for `hostname`, or `None` on any failure
pub(super) fn lookup_first(hostname: &str, family: AddressFamily) -> Option<IpAddr> {
    match (hostname, 0u16).to_socket_addrs() {
        Ok(addrs) => addrs.map(|addr| addr.ip()).find(|ip| family.accepts(ip)),
        Err(err) => {
            debug!("{hostname}: lookup failed: {err}");
            None
        }
    }
}
