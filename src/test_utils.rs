//! In-crate test fixtures: a scriptable capture source and a collecting sink.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{CaptureError, Result};
use crate::sink::PacketSink;
use crate::source::{ArrivalHandler, CaptureSource, StatisticsProbe, StoppedHandler};
use crate::types::{DeliveryRecord, RawFrame, StatisticsSnapshot, StopStatus};

/// A probe returning fixed counters; used where tests only care that a
/// snapshot flows through.
pub struct CountingProbe {
    received: u64,
    dropped: u64,
}

impl CountingProbe {
    pub fn new(received: u64, dropped: u64) -> Self {
        Self { received, dropped }
    }
}

impl StatisticsProbe for CountingProbe {
    fn statistics(&self) -> Result<StatisticsSnapshot> {
        Ok(StatisticsSnapshot::now(self.received, self.dropped))
    }
}

/// Sink that records every call for later assertions.
///
/// `close()` flips the released flag, after which every call is a no-op,
/// matching the contract real sinks honor when their consumer goes away.
#[derive(Default)]
pub struct CollectingSink {
    batches: Mutex<Vec<Vec<DeliveryRecord>>>,
    counts: Mutex<Vec<u64>>,
    stats: Mutex<Vec<StatisticsSnapshot>>,
    closed: AtomicBool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn batches(&self) -> Vec<Vec<DeliveryRecord>> {
        self.batches.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn total_delivered(&self) -> usize {
        self.batches.lock().unwrap_or_else(PoisonError::into_inner).iter().map(Vec::len).sum()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last_count(&self) -> Option<u64> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner).last().copied()
    }

    pub fn statistics(&self) -> Vec<StatisticsSnapshot> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl PacketSink for CollectingSink {
    fn deliver_batch(&self, records: Vec<DeliveryRecord>) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        self.batches.lock().unwrap_or_else(PoisonError::into_inner).push(records);
    }

    fn refresh_count(&self, delivered: u64) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        self.counts.lock().unwrap_or_else(PoisonError::into_inner).push(delivered);
    }

    fn refresh_statistics(&self, snapshot: StatisticsSnapshot) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        self.stats.lock().unwrap_or_else(PoisonError::into_inner).push(snapshot);
    }
}

#[derive(Default)]
struct ScriptedShared {
    arrival: Mutex<Option<ArrivalHandler>>,
    stopped: Mutex<Option<StoppedHandler>>,
    received: AtomicU64,
    dropped: AtomicU64,
    calls: Mutex<Vec<&'static str>>,
    fail_open: AtomicBool,
    fail_start: AtomicBool,
    open: AtomicBool,
    capturing: AtomicBool,
}

impl ScriptedShared {
    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }
}

/// Test-side handle onto a [`ScriptedSource`]: emit frames, report stops,
/// inspect lifecycle calls.
#[derive(Clone)]
pub struct ScriptedHandle {
    shared: Arc<ScriptedShared>,
}

impl ScriptedHandle {
    /// Invoke the registered arrival handler, as the device thread would.
    /// Returns false if no handler is registered (capture torn down).
    pub fn emit(&self, frame: RawFrame) -> bool {
        let handler =
            self.shared.arrival.lock().unwrap_or_else(PoisonError::into_inner).clone();
        match handler {
            Some(handler) => {
                self.shared.received.fetch_add(1, Ordering::SeqCst);
                handler(frame);
                true
            }
            None => false,
        }
    }

    /// Invoke the registered stopped handler with the given status.
    pub fn report_stopped(&self, status: StopStatus) -> bool {
        let handler =
            self.shared.stopped.lock().unwrap_or_else(PoisonError::into_inner).clone();
        match handler {
            Some(handler) => {
                handler(status);
                true
            }
            None => false,
        }
    }

    /// Lifecycle calls made so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.shared.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn has_arrival_handler(&self) -> bool {
        self.shared.arrival.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn has_stopped_handler(&self) -> bool {
        self.shared.stopped.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }

    pub fn is_capturing(&self) -> bool {
        self.shared.capturing.load(Ordering::SeqCst)
    }

    pub fn fail_next_open(&self) {
        self.shared.fail_open.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_start(&self) {
        self.shared.fail_start.store(true, Ordering::SeqCst);
    }
}

struct ScriptedProbe {
    shared: Arc<ScriptedShared>,
}

impl StatisticsProbe for ScriptedProbe {
    fn statistics(&self) -> Result<StatisticsSnapshot> {
        Ok(StatisticsSnapshot::now(
            self.shared.received.load(Ordering::SeqCst),
            self.shared.dropped.load(Ordering::SeqCst),
        ))
    }
}

/// A fully scriptable [`CaptureSource`] for lifecycle and pipeline tests.
pub struct ScriptedSource {
    shared: Arc<ScriptedShared>,
}

impl ScriptedSource {
    pub fn new() -> (Self, ScriptedHandle) {
        let shared = Arc::new(ScriptedShared::default());
        (Self { shared: Arc::clone(&shared) }, ScriptedHandle { shared })
    }
}

#[async_trait::async_trait]
impl CaptureSource for ScriptedSource {
    async fn open(&mut self) -> Result<()> {
        self.shared.record("open");
        if self.shared.fail_open.swap(false, Ordering::SeqCst) {
            return Err(CaptureError::device_open("scripted open failure"));
        }
        self.shared.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn start_capture(&mut self) -> Result<()> {
        self.shared.record("start_capture");
        if self.shared.fail_start.swap(false, Ordering::SeqCst) {
            return Err(CaptureError::capture_start("scripted start failure"));
        }
        self.shared.capturing.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_capture(&mut self) -> Result<()> {
        self.shared.record("stop_capture");
        self.shared.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&mut self) {
        self.shared.record("close");
        self.shared.open.store(false, Ordering::SeqCst);
    }

    fn on_arrival(&mut self, handler: Option<ArrivalHandler>) {
        *self.shared.arrival.lock().unwrap_or_else(PoisonError::into_inner) = handler;
    }

    fn on_stopped(&mut self, handler: Option<StoppedHandler>) {
        *self.shared.stopped.lock().unwrap_or_else(PoisonError::into_inner) = handler;
    }

    fn statistics_probe(&self) -> Arc<dyn StatisticsProbe> {
        Arc::new(ScriptedProbe { shared: Arc::clone(&self.shared) })
    }
}
