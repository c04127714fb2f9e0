//! Mutex-guarded intake buffer between capture callbacks and the worker.
//!
//! The queue is the only state mutated by more than one logical actor: any
//! number of capture callbacks append while a single worker drains. Both
//! operations keep their critical section minimal (`append` pushes one frame,
//! `drain_all` swaps the whole buffer out), so frame processing always happens
//! outside the lock and producer latency stays bounded.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::types::RawFrame;

/// Growth policy for the intake buffer.
///
/// The reference behavior is `Unbounded`: if producers outpace the drain
/// cadence the buffer grows without limit. `Bounded` caps the buffer and drops
/// incoming frames at the tail once full; drops are counted and folded into
/// the statistics snapshots forwarded to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueuePolicy {
    /// Never drop; memory use is the producer/consumer imbalance
    Unbounded,
    /// Drop arrivals once this many frames are buffered
    Bounded(usize),
}

impl Default for QueuePolicy {
    fn default() -> Self {
        QueuePolicy::Unbounded
    }
}

/// Ordered buffer of raw frames with concurrent append and atomic swap-drain.
pub struct IntakeQueue {
    frames: Mutex<Vec<RawFrame>>,
    policy: QueuePolicy,
    overflow_dropped: AtomicU64,
}

impl IntakeQueue {
    /// Create a queue with the given growth policy.
    pub fn new(policy: QueuePolicy) -> Self {
        Self { frames: Mutex::new(Vec::new()), policy, overflow_dropped: AtomicU64::new(0) }
    }

    /// Append a frame at the tail.
    ///
    /// Safe to call from any number of concurrent producers. Under a bounded
    /// policy a frame arriving at a full buffer is dropped and counted instead
    /// of blocking the caller.
    pub fn append(&self, frame: RawFrame) {
        let mut frames = self.lock();
        if let QueuePolicy::Bounded(cap) = self.policy {
            if frames.len() >= cap {
                drop(frames);
                self.overflow_dropped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        frames.push(frame);
    }

    /// Atomically exchange the buffer for an empty one and return the previous
    /// contents in arrival order.
    ///
    /// Called by exactly one worker. The swap is a single critical section, so
    /// no concurrent append is ever lost or duplicated across it. Draining an
    /// empty queue returns an empty batch and disturbs nothing.
    pub fn drain_all(&self) -> Vec<RawFrame> {
        std::mem::take(&mut *self.lock())
    }

    /// Cheap peek used by the worker to decide whether to sleep.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Frames currently buffered.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Frames dropped so far by a bounded policy.
    pub fn overflow_dropped(&self) -> u64 {
        self.overflow_dropped.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RawFrame>> {
        // A panicking producer must not wedge the drain path.
        self.frames.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
