//! VXLAN encapsulation (RFC 7348)
//!
//! The collector receives each mirrored frame as the payload of a UDP
//! datagram, prefixed with the 8-byte VXLAN header. Only the I flag is set
//! (VNI valid); both reserved fields stay zero.

/// Size of the VXLAN header in bytes.
pub const VXLAN_HEADER_SIZE: usize = 8;

/// Flag byte with the I bit set, marking the VNI field as valid.
const FLAG_VNI_VALID: u8 = 0x08;

/// Prepend a VXLAN header carrying `vni` to a captured frame.
///
/// The caller guarantees `vni` fits in 24 bits (config validation enforces
/// it); higher bits are masked off here so a malformed value can never leak
/// into the reserved byte.
pub fn encapsulate(vni: u32, frame: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(VXLAN_HEADER_SIZE + frame.len());
    packet.extend_from_slice(&[FLAG_VNI_VALID, 0, 0, 0]);
    packet.extend_from_slice(&((vni & 0x00FF_FFFF) << 8).to_be_bytes());
    packet.extend_from_slice(frame);
    packet
}

/// Read the VNI back out of an encapsulated packet.
///
/// Returns `None` when the buffer is too short to hold a VXLAN header.
pub fn vni_of(packet: &[u8]) -> Option<u32> {
    if packet.len() < VXLAN_HEADER_SIZE {
        return None;
    }
    let word = u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]]);
    Some(word >> 8)
}
