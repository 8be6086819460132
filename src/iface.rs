//! Interface enumeration and selection
//!
//! The sensor must never mirror the segment it is managed over, and
//! capturing loopback would mostly mirror the sensor's own chatter.
//! Addressless interfaces stay capturable: a SPAN or tap port carries no
//! address of its own, and those are exactly where a mirroring sensor gets
//! attached. Each interface gets a verdict; the `interfaces` subcommand
//! surfaces these so an operator can confirm the selection before running
//! the sensor for real.

use std::fmt;
use std::net::IpAddr;

use ipnetwork::IpNetwork;
use pnet::datalink::{self, NetworkInterface};

/// Selection outcome for one interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Capture traffic on this interface.
    Capture,
    /// Skipped: loopback interface or loopback-bound address.
    Loopback,
    /// Skipped: holds an address inside the control network.
    ControlNet(IpAddr),
}

impl Verdict {
    pub fn is_capture(&self) -> bool {
        matches!(self, Verdict::Capture)
    }

    /// Stable identifier used in NDJSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Capture => "capture",
            Verdict::Loopback => "loopback",
            Verdict::ControlNet(_) => "control_net",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Capture => write!(f, "capture"),
            Verdict::Loopback => write!(f, "skip (loopback)"),
            Verdict::ControlNet(ip) => write!(f, "skip ({} is on the control network)", ip),
        }
    }
}

/// Classify one interface against the control network.
///
/// Only a disqualifying address (loopback or control-network) rules an
/// interface out; an interface with no addresses at all has nothing to
/// disqualify it and is captured.
pub fn classify(is_loopback: bool, ips: &[IpNetwork], control: &IpNetwork) -> Verdict {
    if is_loopback || ips.iter().any(|net| net.ip().is_loopback()) {
        return Verdict::Loopback;
    }
    if let Some(ip) = ips.iter().map(|net| net.ip()).find(|ip| control.contains(*ip)) {
        return Verdict::ControlNet(ip);
    }
    Verdict::Capture
}

/// Enumerate the host's interfaces and attach a verdict to each.
pub fn survey(control: &IpNetwork) -> Vec<(NetworkInterface, Verdict)> {
    datalink::interfaces()
        .into_iter()
        .map(|iface| {
            let verdict = classify(iface.is_loopback(), &iface.ips, control);
            (iface, verdict)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> IpNetwork {
        "10.9.0.0/24".parse().unwrap()
    }

    fn net(s: &str) -> IpNetwork {
        s.parse().unwrap()
    }

    #[test]
    fn test_ordinary_interface_is_captured() {
        let verdict = classify(false, &[net("192.168.1.5/24")], &control());
        assert_eq!(verdict, Verdict::Capture);
    }

    #[test]
    fn test_loopback_flag_skips() {
        let verdict = classify(true, &[net("127.0.0.1/8")], &control());
        assert_eq!(verdict, Verdict::Loopback);
    }

    #[test]
    fn test_loopback_address_skips_even_without_flag() {
        let verdict = classify(false, &[net("127.0.0.1/8")], &control());
        assert_eq!(verdict, Verdict::Loopback);
    }

    #[test]
    fn test_addressless_tap_port_is_captured() {
        let verdict = classify(false, &[], &control());
        assert_eq!(verdict, Verdict::Capture);
    }

    #[test]
    fn test_control_network_address_skips() {
        let verdict = classify(
            false,
            &[net("192.168.1.5/24"), net("10.9.0.17/24")],
            &control(),
        );
        assert_eq!(
            verdict,
            Verdict::ControlNet("10.9.0.17".parse().unwrap())
        );
    }

    #[test]
    fn test_address_outside_control_network_is_captured() {
        let verdict = classify(false, &[net("10.10.0.17/24")], &control());
        assert_eq!(verdict, Verdict::Capture);
    }

    #[test]
    fn test_ipv6_address_against_ipv4_control_net_is_captured() {
        let verdict = classify(false, &[net("fd00::1/64")], &control());
        assert_eq!(verdict, Verdict::Capture);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Capture.to_string(), "capture");
        assert_eq!(Verdict::Loopback.to_string(), "skip (loopback)");
        assert_eq!(
            Verdict::ControlNet("10.9.0.17".parse().unwrap()).to_string(),
            "skip (10.9.0.17 is on the control network)"
        );
    }
}
