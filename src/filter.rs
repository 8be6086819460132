//! Capture filtering
//!
//! Two layers decide whether a captured frame is mirrored. The export-loop
//! exclusion is not configurable: a UDP datagram addressed to the collector
//! endpoint is the sensor's own output (or another sensor's), and mirroring
//! it would feed the mirror back into itself. The user filter from the
//! configuration is applied after that, with empty lists acting as
//! wildcards.

use std::net::SocketAddr;

use crate::config::{FilterConfig, Protocol};
use crate::frame::{self, FrameSummary, Transport};

/// Per-frame mirror/drop policy for one capture worker.
#[derive(Debug, Clone)]
pub struct CaptureFilter {
    collector: SocketAddr,
    user: FilterConfig,
}

impl CaptureFilter {
    pub fn new(collector: SocketAddr, user: FilterConfig) -> Self {
        Self { collector, user }
    }

    /// Decide whether a raw captured frame should be mirrored.
    pub fn should_mirror(&self, raw: &[u8]) -> bool {
        self.decide(frame::parse(raw).as_ref())
    }

    /// Parsed-frame variant, for callers that already hold the summary.
    ///
    /// Non-IP frames (`None`) are mirrored only when no user filter is
    /// configured; a filter names L3/L4 properties such frames do not have.
    pub fn decide(&self, summary: Option<&FrameSummary>) -> bool {
        match summary {
            None => self.user.is_empty(),
            Some(s) => !self.is_export_traffic(s) && self.user_allows(s),
        }
    }

    fn is_export_traffic(&self, summary: &FrameSummary) -> bool {
        match summary.transport {
            Transport::Udp { dst, .. } => {
                dst == self.collector.port() && summary.dst == self.collector.ip()
            }
            _ => false,
        }
    }

    fn user_allows(&self, summary: &FrameSummary) -> bool {
        if !self.user.protocols.is_empty() {
            let protocol = match summary.transport {
                Transport::Tcp { .. } => Some(Protocol::Tcp),
                Transport::Udp { .. } => Some(Protocol::Udp),
                Transport::Icmp => Some(Protocol::Icmp),
                Transport::Other(_) => None,
            };
            match protocol {
                Some(p) if self.user.protocols.contains(&p) => {}
                _ => return false,
            }
        }

        if !self.user.ports.is_empty() {
            let matched = match summary.transport {
                Transport::Tcp { src, dst } | Transport::Udp { src, dst } => {
                    self.user.ports.contains(&src) || self.user.ports.contains(&dst)
                }
                // Port filters cannot match portless transports.
                _ => false,
            };
            if !matched {
                return false;
            }
        }

        if !self.user.hosts.is_empty()
            && !self.user.hosts.contains(&summary.src)
            && !self.user.hosts.contains(&summary.dst)
        {
            return false;
        }

        true
    }
}
