//! UDP export to the collector
//!
//! Each encapsulated frame leaves the sensor from the source port its flow
//! hashed to, so the exporter keeps one bound socket per port in use. The
//! collector endpoint is resolved once at startup; a sensor with an
//! unresolvable collector has nowhere to send anything and should not
//! start.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use crate::error::{ArrowError, ArrowResult};

/// Resolve the collector endpoint to a socket address.
pub fn resolve_collector(host: &str, port: u16) -> ArrowResult<SocketAddr> {
    let endpoint = format!("{}:{}", host, port);
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or(ArrowError::UnresolvableCollector { endpoint })
}

/// Sends encapsulated frames to the collector, caching one socket per
/// flow-derived source port.
#[derive(Debug)]
pub struct Exporter {
    collector: SocketAddr,
    sockets: HashMap<u16, UdpSocket>,
}

impl Exporter {
    pub fn new(collector: SocketAddr) -> Self {
        Self {
            collector,
            sockets: HashMap::new(),
        }
    }

    pub fn collector(&self) -> SocketAddr {
        self.collector
    }

    /// Send one encapsulated frame from the given source port.
    ///
    /// A bind or send failure is returned to the caller, which logs it and
    /// drops the packet; a failed port is not cached, so a transient bind
    /// conflict heals once the conflicting socket goes away.
    pub fn send(&mut self, src_port: u16, payload: &[u8]) -> io::Result<usize> {
        let socket = match self.sockets.entry(src_port) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let local: SocketAddr = match self.collector.ip() {
                    IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, src_port).into(),
                    IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, src_port).into(),
                };
                entry.insert(UdpSocket::bind(local)?)
            }
        };
        socket.send_to(payload, self.collector)
    }
}
