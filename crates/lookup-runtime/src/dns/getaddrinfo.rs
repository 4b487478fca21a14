//! `getaddrinfo(3)` lookups on unix

use std::ffi::{CStr, CString};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ptr;
use log::debug;
use super::AddressFamily;

/// Owned result list, released with `freeaddrinfo` on drop
struct AddrInfoList(*mut libc::addrinfo);

impl AddrInfoList {
    fn iter(&self) -> impl Iterator<Item = &libc::addrinfo> + '_ {
        let mut cur = self.0;
        std::iter::from_fn(move || {
            if cur.is_null() {
                return None;
            }
            // Safety: every node in the list stays valid until freeaddrinfo
            let ai = unsafe { &*cur };
            cur = ai.ai_next;
            Some(ai)
        })
    }
}

impl Drop for AddrInfoList {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // Safety: the list came from a successful getaddrinfo call
            unsafe { libc::freeaddrinfo(self.0) };
        }
    }
}

/// First address of `family` for `hostname`, or `None` on any failure
pub(super) fn lookup_first(hostname: &str, family: AddressFamily) -> Option<IpAddr> {
    let Ok(host) = CString::new(hostname) else {
        debug!("{hostname:?}: contains a NUL byte");
        return None;
    };

    // Safety: all-zero is the documented "no hints" value of addrinfo
    let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
    hints.ai_family = match family {
        AddressFamily::Any => libc::AF_UNSPEC,
        AddressFamily::V4 => libc::AF_INET,
        AddressFamily::V6 => libc::AF_INET6,
    };
    hints.ai_socktype = libc::SOCK_STREAM;

    let mut res: *mut libc::addrinfo = ptr::null_mut();
    // Safety: host is NUL-terminated, hints is initialised and res is a valid out pointer
    let rc = unsafe { libc::getaddrinfo(host.as_ptr(), ptr::null(), &hints, &mut res) };
    if rc != 0 {
        debug!("{hostname}: getaddrinfo failed: {}", gai_message(rc));
        return None;
    }

    let list = AddrInfoList(res);
    let found = list.iter().filter_map(to_ip).find(|ip| family.accepts(ip));
    found
}

fn to_ip(ai: &libc::addrinfo) -> Option<IpAddr> {
    if ai.ai_addr.is_null() {
        return None;
    }
    match ai.ai_family {
        libc::AF_INET => {
            // Safety: ai_family says ai_addr points at a sockaddr_in
            let sin = unsafe { &*(ai.ai_addr as *const libc::sockaddr_in) };
            Some(IpAddr::V4(Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr))))
        }
        libc::AF_INET6 => {
            // Safety: ai_family says ai_addr points at a sockaddr_in6
            let sin6 = unsafe { &*(ai.ai_addr as *const libc::sockaddr_in6) };
            Some(IpAddr::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr)))
        }
        _ => None,
    }
}

fn gai_message(rc: libc::c_int) -> String {
    // Safety: gai_strerror returns a pointer to a static NUL-terminated string
    unsafe { CStr::from_ptr(libc::gai_strerror(rc)) }
        .to_string_lossy()
        .into_owned()
}
