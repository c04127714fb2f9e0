//! Delivery surface consumed by the drain worker.
//!
//! A sink is whatever ultimately shows or stores delivered records: a UI data
//! source, a logger, a downstream processor. All sink calls are made from the
//! drain worker's task and must be non-blocking; a sink whose consumer has
//! gone away must treat every call as a no-op rather than an error.
//!
//! [`ChannelSink`] is a ready-made implementation that forwards sink calls
//! onto a tokio channel and hands the consumer a `Stream` of events.

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::types::{DeliveryRecord, StatisticsSnapshot};

/// Thread-safe delivery surface for captured packets.
///
/// The worker makes exactly one `deliver_batch` and one `refresh_count` call
/// per drain cycle, so cross-task traffic is bounded regardless of batch size.
pub trait PacketSink: Send + Sync + 'static {
    /// Append newly delivered records. Records arrive in capture order and
    /// their indices continue the previous batch without gaps.
    fn deliver_batch(&self, records: Vec<DeliveryRecord>);

    /// Update the visible running total of delivered packets.
    fn refresh_count(&self, delivered: u64);

    /// Update visible throughput/drop indicators.
    fn refresh_statistics(&self, snapshot: StatisticsSnapshot);
}

/// Events a [`ChannelSink`] forwards to its consumer stream.
#[derive(Debug, Clone)]
pub enum SinkEvent {
    /// A drain cycle's ordered batch of records
    Batch(Vec<DeliveryRecord>),
    /// Running total of delivered packets
    Count(u64),
    /// Refreshed capture statistics
    Statistics(StatisticsSnapshot),
}

/// A [`PacketSink`] that bridges deliveries onto an unbounded tokio channel.
///
/// Once the consumer drops its stream the channel closes and every subsequent
/// sink call becomes a silent no-op, which is exactly the released-sink
/// contract the worker relies on during teardown.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    /// Create a sink and the stream its consumer reads from.
    pub fn new() -> (Self, impl Stream<Item = SinkEvent> + Send + 'static) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, UnboundedReceiverStream::new(rx))
    }
}

impl PacketSink for ChannelSink {
    fn deliver_batch(&self, records: Vec<DeliveryRecord>) {
        if records.is_empty() {
            return;
        }
        let _ = self.tx.send(SinkEvent::Batch(records));
    }

    fn refresh_count(&self, delivered: u64) {
        let _ = self.tx.send(SinkEvent::Count(delivered));
    }

    fn refresh_statistics(&self, snapshot: StatisticsSnapshot) {
        let _ = self.tx.send(SinkEvent::Statistics(snapshot));
    }
}
