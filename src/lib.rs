//! Ordered, non-blocking delivery of live-captured network packets.
//!
//! Tapline moves frames from a capture source's arrival callback to a
//! consumer sink in strict arrival order, without blocking the capture source
//! and with bounded cross-thread traffic under load.
//!
//! # Architecture
//!
//! - **[`CaptureSource`]**: the capture backend seam covering open, start, stop,
//!   close, statistics, plus arrival/stopped callbacks invoked from whatever
//!   thread the backend chooses
//! - **[`IntakeQueue`]**: mutex-guarded buffer with O(1) append and atomic
//!   swap-drain, the only state shared between producers and the worker
//! - **[`DrainWorker`]**: one background task that polls on a fixed cadence,
//!   assigns sequence numbers, and pushes ordered batches to the sink
//! - **[`StatsThrottle`]**: statistics refresh at most once per interval,
//!   armed on the arrival path, forwarded by the worker
//! - **[`CaptureSession`]**: lifecycle orchestration and teardown
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tapline::{CaptureError, CaptureSession, ChannelSink};
//!
//! #[tokio::main]
//! async fn main() -> tapline::Result<()> {
//!     let (sink, _events) = ChannelSink::new();
//!     let mut session = CaptureSession::new(Arc::new(sink));
//!
//!     // session.select_source(Box::new(some_capture_backend));
//!     match session.start().await {
//!         Err(CaptureError::NoDeviceSelected) => { /* prompt for a device */ }
//!         other => other?,
//!     }
//!
//!     session.stop().await?;
//!     Ok(())
//! }
//! ```

mod device;
mod error;
pub mod queue;
pub mod session;
pub mod sink;
pub mod source;
pub mod throttle;
pub mod types;
pub mod worker;

#[cfg(test)]
pub mod test_utils;

// Core exports
pub use device::{DeviceInfo, DeviceList};
pub use error::{CaptureError, Result};
pub use types::*;

// Pipeline exports
pub use queue::{IntakeQueue, QueuePolicy};
pub use session::{CaptureSession, SessionConfig, SessionState};
pub use sink::{ChannelSink, PacketSink, SinkEvent};
pub use source::{ArrivalHandler, CaptureSource, StatisticsProbe, StoppedHandler};
pub use throttle::StatsThrottle;
pub use worker::{DrainWorker, WorkerHandle};
