//! Capture source trait for capture backends.
//!
//! Sources abstract over whatever actually captures packets (a pcap handle, a
//! kernel tap, a scripted replay). The pipeline depends only on this seam,
//! never on a concrete device type. Lifecycle calls are made by the session;
//! the arrival and stopped callbacks are invoked by the backend from whichever
//! thread it chooses, potentially concurrently, so handlers must be cheap and
//! must never block beyond a brief critical section.

use std::sync::Arc;

use crate::Result;
use crate::types::{RawFrame, StatisticsSnapshot, StopStatus};

/// Handler invoked for every frame the device captures.
///
/// Called from the backend's capture thread(s). Implementations append to the
/// intake queue and return; holding any lock across packet-processing work
/// here would stall the capture source.
pub type ArrivalHandler = Arc<dyn Fn(RawFrame) + Send + Sync>;

/// Handler invoked once when capture ends, with the reported status.
pub type StoppedHandler = Arc<dyn Fn(StopStatus) + Send + Sync>;

/// Sync statistics access, usable from inside the arrival callback.
///
/// Split from [`CaptureSource`] so the arrival path can pull a snapshot
/// without touching the `&mut` lifecycle surface the session owns. Backends
/// typically return a cheap handle over the same underlying device.
pub trait StatisticsProbe: Send + Sync {
    /// Pull the device's current received/dropped counters.
    fn statistics(&self) -> Result<StatisticsSnapshot>;
}

/// Capability interface for an opaque capture device.
///
/// The session drives the lifecycle in this order: `open`, handler
/// registration, initial statistics pull, `start_capture`; teardown is the
/// reverse. Lifecycle methods are async because opening real devices can
/// involve slow system calls, but backends are expected to complete them
/// promptly; no internal timeout is imposed.
#[async_trait::async_trait]
pub trait CaptureSource: Send + 'static {
    /// Open the device. Must be called before any other lifecycle method.
    async fn open(&mut self) -> Result<()>;

    /// Begin invoking the arrival handler for captured frames.
    async fn start_capture(&mut self) -> Result<()>;

    /// Stop invoking handlers. Idempotent.
    async fn stop_capture(&mut self) -> Result<()>;

    /// Release the device. Idempotent.
    async fn close(&mut self);

    /// Register or clear the per-frame arrival handler.
    ///
    /// `None` unregisters: after it returns, the backend must not invoke a
    /// previously registered handler again.
    fn on_arrival(&mut self, handler: Option<ArrivalHandler>);

    /// Register or clear the capture-stopped handler.
    fn on_stopped(&mut self, handler: Option<StoppedHandler>);

    /// A sync statistics handle for the arrival path.
    fn statistics_probe(&self) -> Arc<dyn StatisticsProbe>;
}
