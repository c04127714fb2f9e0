//! Raw captured frames

use std::sync::Arc;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Link-layer header type of a captured frame.
///
/// Values mirror the common pcap DLT assignments so sources backed by a real
/// capture library can map their native constant straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkLayer {
    /// BSD loopback encapsulation (DLT 0)
    Null,
    /// Ethernet (DLT 1)
    Ethernet,
    /// Raw IP, no link-layer header (DLT 101)
    RawIp,
    /// IEEE 802.11 wireless (DLT 105)
    Ieee802_11,
    /// Any other DLT value, carried through unchanged
    Other(u16),
}

impl LinkLayer {
    /// Map a pcap DLT value onto the known variants.
    pub fn from_dlt(dlt: u16) -> Self {
        match dlt {
            0 => LinkLayer::Null,
            1 => LinkLayer::Ethernet,
            101 => LinkLayer::RawIp,
            105 => LinkLayer::Ieee802_11,
            other => LinkLayer::Other(other),
        }
    }

    /// The pcap DLT value for this link layer.
    pub fn dlt(self) -> u16 {
        match self {
            LinkLayer::Null => 0,
            LinkLayer::Ethernet => 1,
            LinkLayer::RawIp => 101,
            LinkLayer::Ieee802_11 => 105,
            LinkLayer::Other(other) => other,
        }
    }
}

/// One captured unit of network data plus its capture metadata.
///
/// Frames are immutable once built. The payload is shared via `Arc` so a frame
/// can move from the capture callback through the intake queue and into a
/// delivery batch without copying packet bytes.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Packet bytes as captured off the wire (zero-copy via Arc)
    pub data: Arc<[u8]>,

    /// Arrival timestamp reported by the capture source
    pub timestamp: SystemTime,

    /// Link-layer type of the capture device
    pub link_layer: LinkLayer,
}

impl RawFrame {
    /// Create a new frame from captured bytes.
    pub fn new(data: Vec<u8>, timestamp: SystemTime, link_layer: LinkLayer) -> Self {
        Self { data: data.into(), timestamp, link_layer }
    }

    /// Captured length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the capture contained no payload bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
