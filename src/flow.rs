//! Flow-derived source ports
//!
//! The VXLAN RFC recommends spreading encapsulated traffic across the
//! ephemeral source-port range using a hash of the inner packet, so ECMP
//! paths between sensor and collector stay balanced per flow. The hash here
//! is over the IP endpoint pair only, ordered canonically, which gives
//! directionality parity: both halves of a conversation leave the sensor
//! from the same source port and land in the same collector-side bucket.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::frame::FrameSummary;

/// Bottom of the IANA ephemeral port range.
pub const PORT_MIN: u16 = 49152;
/// Top of the IANA ephemeral port range.
pub const PORT_MAX: u16 = 65535;
/// Number of ports available for flow hashing.
pub const PORT_RANGE: u32 = (PORT_MAX - PORT_MIN) as u32 + 1;

/// Map a parsed frame to its export source port.
///
/// Frames with no extractable network layer fall back to `PORT_MAX`, so
/// non-IP traffic all shares one bucket rather than being dropped.
pub fn source_port(summary: Option<&FrameSummary>) -> u16 {
    match summary {
        Some(s) => flow_port(s),
        None => PORT_MAX,
    }
}

fn flow_port(summary: &FrameSummary) -> u16 {
    // Canonical endpoint order makes A->B hash the same as B->A.
    let (lo, hi) = if summary.src <= summary.dst {
        (summary.src, summary.dst)
    } else {
        (summary.dst, summary.src)
    };

    // DefaultHasher::new() uses fixed keys, so a flow keeps its port for
    // the sensor's whole lifetime.
    let mut hasher = DefaultHasher::new();
    lo.hash(&mut hasher);
    hi.hash(&mut hasher);

    PORT_MIN + (hasher.finish() % u64::from(PORT_RANGE)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Transport;
    use std::net::{IpAddr, Ipv4Addr};

    fn summary(src: [u8; 4], dst: [u8; 4]) -> FrameSummary {
        FrameSummary {
            src: IpAddr::V4(Ipv4Addr::from(src)),
            dst: IpAddr::V4(Ipv4Addr::from(dst)),
            transport: Transport::Udp { src: 1000, dst: 2000 },
        }
    }

    #[test]
    fn test_port_is_in_ephemeral_range() {
        let port = source_port(Some(&summary([10, 0, 0, 1], [10, 0, 0, 2])));
        assert!(port >= PORT_MIN);
    }

    #[test]
    fn test_direction_parity() {
        let forward = summary([10, 0, 0, 1], [172, 16, 5, 9]);
        let reverse = summary([172, 16, 5, 9], [10, 0, 0, 1]);
        assert_eq!(source_port(Some(&forward)), source_port(Some(&reverse)));
    }

    #[test]
    fn test_distinct_flows_usually_get_distinct_ports() {
        let a = source_port(Some(&summary([10, 0, 0, 1], [10, 0, 0, 2])));
        let b = source_port(Some(&summary([10, 0, 0, 1], [10, 0, 0, 3])));
        let c = source_port(Some(&summary([192, 168, 7, 7], [8, 8, 8, 8])));
        // Not guaranteed by hashing, but these three fixed flows do differ.
        assert!(a != b || b != c);
    }

    #[test]
    fn test_non_ip_falls_back_to_port_max() {
        assert_eq!(source_port(None), PORT_MAX);
    }

    #[test]
    fn test_port_is_stable_across_calls() {
        let s = summary([10, 1, 2, 3], [10, 4, 5, 6]);
        assert_eq!(source_port(Some(&s)), source_port(Some(&s)));
    }
}
