use std::net::{IpAddr, Ipv6Addr};

/// Whether `ip` can be used as a scan address.
///
/// Loopback, unspecified and link-local addresses are rejected.
pub fn is_usable(ip: &IpAddr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return false;
    }
    match ip {
        IpAddr::V4(v4) => !v4.is_link_local(),
        IpAddr::V6(v6) => !is_unicast_link_local(v6),
    }
}

/// Parses `raw` and applies [`is_usable`]. Unparsable input is not usable.
pub fn parse_usable(raw: &str) -> Option<IpAddr> {
    raw.trim().parse::<IpAddr>().ok().filter(is_usable)
}

fn is_unicast_link_local(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_routable() {
        for raw in ["127.0.0.1", "0.0.0.0", "169.254.10.1", "::1", "::", "fe80::1"] {
            assert!(parse_usable(raw).is_none(), "{raw} should be rejected");
        }
    }

    #[test]
    fn accepts_regular_addresses() {
        for raw in ["10.0.0.1", " 192.168.1.20 ", "2a02:908:8c1:b880::b054"] {
            assert!(parse_usable(raw).is_some(), "{raw} should be accepted");
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_usable("host.local").is_none());
        assert!(parse_usable("").is_none());
    }
}
