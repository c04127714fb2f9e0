//! Drain worker: the single background task of the pipeline.
//!
//! The worker polls the intake queue on a fixed cadence. An empty queue costs
//! one cheap peek per tick; a non-empty queue is swap-drained and the batch is
//! processed entirely outside the intake lock: sequence numbers are assigned
//! in arrival order, records are handed to the sink as one ordered batch, the
//! running count is refreshed, and any pending statistics snapshot is
//! forwarded. That bounds sink traffic to a handful of calls per cycle no
//! matter how large the batch grew.
//!
//! Cancellation is cooperative: the token is observed at the top of every
//! iteration, so the loop exits within one polling interval of being
//! cancelled. Because the session unregisters the arrival callback before
//! cancelling, a final flush drain on the way out delivers every frame that
//! was accepted.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::queue::IntakeQueue;
use crate::sink::PacketSink;
use crate::throttle::StatsThrottle;
use crate::types::DeliveryRecord;

/// Handle to a spawned drain worker.
pub struct WorkerHandle {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl WorkerHandle {
    /// Ask the worker to stop. The loop exits within one polling interval.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the worker task to finish.
    pub async fn join(self) {
        if self.handle.await.is_err() {
            warn!("drain worker task panicked");
        }
    }

    /// Whether the worker task has already exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns and runs the drain loop.
pub struct DrainWorker;

impl DrainWorker {
    /// Spawn the drain loop over the given queue, sink, and throttle.
    pub fn spawn(
        queue: Arc<IntakeQueue>,
        sink: Arc<dyn PacketSink>,
        throttle: Arc<StatsThrottle>,
        poll_interval: Duration,
    ) -> WorkerHandle {
        let cancel = CancellationToken::new();
        let cancel_loop = cancel.clone();

        let handle = tokio::spawn(async move {
            Self::drain_loop(queue, sink, throttle, poll_interval, cancel_loop).await;
        });

        WorkerHandle { handle, cancel }
    }

    async fn drain_loop(
        queue: Arc<IntakeQueue>,
        sink: Arc<dyn PacketSink>,
        throttle: Arc<StatsThrottle>,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) {
        info!("drain worker started (poll interval {:?})", poll_interval);

        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut next_index = 0u64;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if queue.is_empty() {
                continue;
            }
            next_index = Self::drain_cycle(&queue, sink.as_ref(), &throttle, next_index);
        }

        // Final flush: arrivals were unregistered before cancellation, so this
        // delivers everything that was accepted.
        next_index = Self::drain_cycle(&queue, sink.as_ref(), &throttle, next_index);

        info!("drain worker stopped after delivering {} packets", next_index);
    }

    /// One drain cycle. Returns the next sequence number to assign.
    fn drain_cycle(
        queue: &IntakeQueue,
        sink: &dyn PacketSink,
        throttle: &StatsThrottle,
        mut next_index: u64,
    ) -> u64 {
        let batch = queue.drain_all();
        if !batch.is_empty() {
            trace!("draining {} frames", batch.len());

            let mut records = Vec::with_capacity(batch.len());
            for frame in batch {
                records.push(DeliveryRecord::new(next_index, frame));
                next_index += 1;
            }
            sink.deliver_batch(records);
            sink.refresh_count(next_index);
        }

        if let Some(mut snapshot) = throttle.take_pending() {
            // Fold intake overflow into the device's drop counter so a bounded
            // queue stays observable through the normal statistics surface.
            snapshot.dropped += queue.overflow_dropped();
            sink.refresh_statistics(snapshot);
        }

        next_index
    }
}
