//! Sequence-numbered delivery records

use std::sync::Arc;
use std::time::SystemTime;

use super::{LinkLayer, RawFrame};

/// A captured frame as delivered to the sink.
///
/// The index is assigned by the drain worker at drain time: 0-based, strictly
/// increasing, gap-free for the lifetime of one session, never reused. The
/// display fields (length, link layer, timestamp) come straight from the
/// frame; no payload parsing is required to render a record.
#[derive(Debug, Clone)]
pub struct DeliveryRecord {
    index: u64,
    frame: RawFrame,
}

impl DeliveryRecord {
    /// Wrap a drained frame with its sequence number.
    pub fn new(index: u64, frame: RawFrame) -> Self {
        Self { index, frame }
    }

    /// Sequence number assigned at drain time.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Captured length in bytes.
    pub fn len(&self) -> usize {
        self.frame.len()
    }

    /// Whether the underlying capture was empty.
    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// Link-layer type of the capturing device.
    pub fn link_layer(&self) -> LinkLayer {
        self.frame.link_layer
    }

    /// Arrival timestamp reported by the capture source.
    pub fn timestamp(&self) -> SystemTime {
        self.frame.timestamp
    }

    /// Packet bytes, shared zero-copy with the original frame.
    ///
    /// Consumers that decode packets on demand (a detail pane, a logger) work
    /// from these bytes; the pipeline itself never parses them.
    pub fn data(&self) -> &Arc<[u8]> {
        &self.frame.data
    }
}
