//! Capture session lifecycle.
//!
//! A [`CaptureSession`] owns one capture cycle end to end: it opens the
//! selected source, registers the arrival/stopped callbacks, pushes an
//! initial statistics snapshot, spawns the drain worker, and starts capture;
//! teardown runs the sequence in reverse. Sessions are reusable: after a
//! stop, `start()` runs a fresh cycle with sequence numbers back at zero.


use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CaptureError, Result};
use crate::queue::{IntakeQueue, QueuePolicy};
use crate::sink::PacketSink;
use crate::source::CaptureSource;
use crate::throttle::StatsThrottle;
use crate::types::StopStatus;
use crate::worker::{DrainWorker, WorkerHandle};

/// Tuning knobs for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Drain worker polling cadence for the idle case
    pub poll_interval: Duration,

    /// Minimum spacing between statistics refreshes
    pub stats_interval: Duration,

    /// Intake buffer growth policy
    pub queue_policy: QueuePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            stats_interval: Duration::from_secs(2),
            queue_policy: QueuePolicy::Unbounded,
        }
    }
}

/// Observable lifecycle state of a session.
///
/// `Opening` and `Stopping` are transient within `start()`/`stop()`; between
/// calls a session is `Idle`, `Running`, or `Stopped` (detached stop issued,
/// worker possibly still winding down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Opening,
    Running,
    Stopping,
    Stopped,
}

/// Orchestrates the capture-arrival-to-delivery pipeline for one source.
pub struct CaptureSession {
    config: SessionConfig,
    sink: Arc<dyn PacketSink>,
    source: Option<Box<dyn CaptureSource>>,
    /// Source selected while a capture was active; swapped in at next start.
    pending_source: Option<Box<dyn CaptureSource>>,
    state: SessionState,
    worker: Option<WorkerHandle>,
    /// Worker handle parked by a detached stop, joined before the next start.
    draining: Option<WorkerHandle>,
    stop_status: Arc<Mutex<Option<StopStatus>>>,
}

impl CaptureSession {
    /// Create a session delivering to the given sink, with default tuning.
    pub fn new(sink: Arc<dyn PacketSink>) -> Self {
        Self::with_config(sink, SessionConfig::default())
    }

    /// Create a session with explicit tuning.
    pub fn with_config(sink: Arc<dyn PacketSink>, config: SessionConfig) -> Self {
        Self {
            config,
            sink,
            source: None,
            pending_source: None,
            state: SessionState::Idle,
            worker: None,
            draining: None,
            stop_status: Arc::new(Mutex::new(None)),
        }
    }

    /// Select the capture source for subsequent starts.
    ///
    /// Replacing the source while a capture is active does not affect the
    /// running cycle: the session keeps tearing down the device it opened,
    /// and the new source takes effect at the next `start()`.
    pub fn select_source(&mut self, source: Box<dyn CaptureSource>) {
        match self.state {
            SessionState::Idle | SessionState::Stopped => self.source = Some(source),
            _ => {
                debug!("source selected while capturing; deferred to next start");
                self.pending_source = Some(source);
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Status reported by the source's stopped callback during the current or
    /// most recent cycle, if any. A non-clean status means the device ended
    /// capture abnormally; the session should then be stopped by the caller.
    pub fn last_stop_status(&self) -> Option<StopStatus> {
        *self.stop_status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the selected source and start capturing.
    ///
    /// Fails with [`CaptureError::NoDeviceSelected`] if no source has been
    /// selected and [`CaptureError::AlreadyCapturing`] if a capture is already
    /// running. Any failure while opening or starting rolls the session back
    /// to Idle with callbacks unregistered and the device closed.
    pub async fn start(&mut self) -> Result<()> {
        match self.state {
            SessionState::Idle | SessionState::Stopped => {}
            _ => return Err(CaptureError::AlreadyCapturing),
        }

        // Join-before-restart: never run two workers, even briefly.
        if let Some(prev) = self.draining.take() {
            debug!("waiting for previous drain worker to finish");
            prev.join().await;
        }

        if let Some(pending) = self.pending_source.take() {
            self.source = Some(pending);
        }
        if self.source.is_none() {
            return Err(CaptureError::NoDeviceSelected);
        }

        self.state = SessionState::Opening;
        info!("opening capture device");

        match self.open_and_run().await {
            Ok(()) => {
                self.state = SessionState::Running;
                info!("capture running");
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Idle;
                Err(e)
            }
        }
    }

    async fn open_and_run(&mut self) -> Result<()> {
        let source = self.source.as_mut().ok_or(CaptureError::NoDeviceSelected)?;

        source.open().await?;

        let queue = Arc::new(IntakeQueue::new(self.config.queue_policy));
        let throttle = Arc::new(StatsThrottle::new(self.config.stats_interval));
        *self.stop_status.lock().unwrap_or_else(PoisonError::into_inner) = None;

        let probe = source.statistics_probe();

        // Arrival path: arm the statistics throttle, then append. Nothing
        // here may block beyond the queue's critical section.
        let arrival_queue = Arc::clone(&queue);
        let arrival_throttle = Arc::clone(&throttle);
        let arrival_probe = Arc::clone(&probe);
        source.on_arrival(Some(Arc::new(move |frame| {
            arrival_throttle.on_arrival(arrival_probe.as_ref());
            arrival_queue.append(frame);
        })));

        let status_slot = Arc::clone(&self.stop_status);
        source.on_stopped(Some(Arc::new(move |status| {
            if !status.is_clean() {
                warn!("capture stopped abnormally: {status}");
            }
            *status_slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(status);
        })));

        // Reset the visible count and force an initial statistics update so
        // the sink shows live numbers before the first refresh interval.
        self.sink.refresh_count(0);
        match probe.statistics() {
            Ok(snapshot) => self.sink.refresh_statistics(snapshot),
            Err(e) => {
                source.on_arrival(None);
                source.on_stopped(None);
                source.close().await;
                return Err(e);
            }
        }

        let worker = DrainWorker::spawn(
            queue,
            Arc::clone(&self.sink),
            throttle,
            self.config.poll_interval,
        );

        if let Err(e) = source.start_capture().await {
            worker.cancel();
            worker.join().await;
            source.on_arrival(None);
            source.on_stopped(None);
            source.close().await;
            return Err(e);
        }

        self.worker = Some(worker);
        Ok(())
    }

    /// Stop capturing and wait for the drain worker to exit.
    ///
    /// Stopping an idle session is a no-op, not an error. Frames accepted
    /// before the callbacks were unregistered are flushed to the sink before
    /// this returns.
    pub async fn stop(&mut self) -> Result<()> {
        match self.state {
            SessionState::Idle => return Ok(()),
            SessionState::Stopped => {
                // Detached stop already tore the device down; just reap the
                // worker.
                if let Some(prev) = self.draining.take() {
                    prev.join().await;
                }
                self.state = SessionState::Idle;
                return Ok(());
            }
            _ => {}
        }

        let result = self.teardown_device().await;

        if let Some(worker) = self.worker.take() {
            worker.cancel();
            worker.join().await;
        }

        self.state = SessionState::Idle;
        info!("capture stopped");
        result
    }

    /// Stop capturing without waiting for the drain worker to exit.
    ///
    /// The device is torn down and the worker signalled; its final flush may
    /// still be in progress when this returns. The next `start()` (or a
    /// subsequent `stop()`) joins the winding-down worker first.
    pub async fn stop_detached(&mut self) -> Result<()> {
        match self.state {
            SessionState::Idle | SessionState::Stopped => return Ok(()),
            _ => {}
        }

        let result = self.teardown_device().await;

        if let Some(worker) = self.worker.take() {
            worker.cancel();
            self.draining = Some(worker);
        }

        self.state = SessionState::Stopped;
        info!("capture stopping (detached)");
        result
    }

    async fn teardown_device(&mut self) -> Result<()> {
        self.state = SessionState::Stopping;
        info!("stopping capture");

        let Some(source) = self.source.as_mut() else {
            return Ok(());
        };

        // Unregister first: no further arrivals are accepted, so the worker's
        // final flush sees a complete queue.
        source.on_arrival(None);
        source.on_stopped(None);

        let stop_result = source.stop_capture().await;
        if let Err(e) = &stop_result {
            warn!("stop_capture failed: {e}");
        }
        source.close().await;

        stop_result
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        // Cooperative-only cancellation: we cannot await in drop, but the
        // worker observes the token within one polling interval.
        if let Some(worker) = &self.worker {
            worker.cancel();
        }
        if let Some(worker) = &self.draining {
            worker.cancel();
        }
    }
}
