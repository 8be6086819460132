//! Captured-frame parsing
//!
//! Reduces a raw Ethernet frame to the handful of header fields the sensor
//! actually needs: the IP endpoints and the transport protocol with its
//! ports. Everything past the transport header is opaque payload and is
//! never inspected.

use std::net::IpAddr;

use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::{IpNextHeaderProtocol, IpNextHeaderProtocols};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::tcp::TcpPacket;
use pnet::packet::udp::UdpPacket;
use pnet::packet::Packet;

/// Transport-layer view of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp { src: u16, dst: u16 },
    Udp { src: u16, dst: u16 },
    Icmp,
    /// Any other IP protocol, carrying its protocol number.
    Other(u8),
}

/// The header fields of one captured IP packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSummary {
    pub src: IpAddr,
    pub dst: IpAddr,
    pub transport: Transport,
}

/// Parse an Ethernet frame down to its transport header.
///
/// Returns `None` for frames that are not IPv4 or IPv6 (ARP, LLDP, spanning
/// tree, ...) and for frames too short to carry the headers they claim.
pub fn parse(frame: &[u8]) -> Option<FrameSummary> {
    let ethernet = EthernetPacket::new(frame)?;
    match ethernet.get_ethertype() {
        EtherTypes::Ipv4 => {
            let ip = Ipv4Packet::new(ethernet.payload())?;
            Some(FrameSummary {
                src: IpAddr::V4(ip.get_source()),
                dst: IpAddr::V4(ip.get_destination()),
                transport: parse_transport(ip.get_next_level_protocol(), ip.payload()),
            })
        }
        EtherTypes::Ipv6 => {
            let ip = Ipv6Packet::new(ethernet.payload())?;
            Some(FrameSummary {
                src: IpAddr::V6(ip.get_source()),
                dst: IpAddr::V6(ip.get_destination()),
                transport: parse_transport(ip.get_next_header(), ip.payload()),
            })
        }
        _ => None,
    }
}

fn parse_transport(protocol: IpNextHeaderProtocol, payload: &[u8]) -> Transport {
    match protocol {
        IpNextHeaderProtocols::Tcp => match TcpPacket::new(payload) {
            Some(tcp) => Transport::Tcp {
                src: tcp.get_source(),
                dst: tcp.get_destination(),
            },
            None => Transport::Other(protocol.0),
        },
        IpNextHeaderProtocols::Udp => match UdpPacket::new(payload) {
            Some(udp) => Transport::Udp {
                src: udp.get_source(),
                dst: udp.get_destination(),
            },
            None => Transport::Other(protocol.0),
        },
        IpNextHeaderProtocols::Icmp | IpNextHeaderProtocols::Icmpv6 => Transport::Icmp,
        other => Transport::Other(other.0),
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::*;
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_parse_udp4() {
        let frame = udp4_frame(
            Ipv4Addr::new(192, 168, 1, 10),
            5353,
            Ipv4Addr::new(192, 168, 1, 20),
            53,
            b"query",
        );
        let summary = parse(&frame).unwrap();
        assert_eq!(summary.src, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)));
        assert_eq!(summary.dst, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)));
        assert_eq!(summary.transport, Transport::Udp { src: 5353, dst: 53 });
    }

    #[test]
    fn test_parse_tcp4() {
        let frame = tcp4_frame(
            Ipv4Addr::new(10, 0, 0, 1),
            44123,
            Ipv4Addr::new(10, 0, 0, 2),
            443,
        );
        let summary = parse(&frame).unwrap();
        assert_eq!(
            summary.transport,
            Transport::Tcp {
                src: 44123,
                dst: 443
            }
        );
    }

    #[test]
    fn test_parse_icmp4() {
        let frame = icmp4_frame(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        let summary = parse(&frame).unwrap();
        assert_eq!(summary.transport, Transport::Icmp);
    }

    #[test]
    fn test_parse_udp6() {
        let src = Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 1);
        let dst = Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 2);
        let frame = udp6_frame(src, 1024, dst, 4789);
        let summary = parse(&frame).unwrap();
        assert_eq!(summary.src, IpAddr::V6(src));
        assert_eq!(summary.dst, IpAddr::V6(dst));
        assert_eq!(
            summary.transport,
            Transport::Udp {
                src: 1024,
                dst: 4789
            }
        );
    }

    #[test]
    fn test_parse_non_ip_returns_none() {
        assert!(parse(&arp_frame()).is_none());
    }

    #[test]
    fn test_parse_truncated_frame_returns_none() {
        assert!(parse(&[0u8; 4]).is_none());
    }
}
