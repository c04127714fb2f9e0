//! Interval-gated statistics refresh.
//!
//! Statistics pulls are driven from the arrival path so the numbers stay
//! fresh even when the drain worker is briefly delayed, but gated to at most
//! one pull per interval so an arbitrarily high arrival rate never turns into
//! a statistics hot loop. The pulled snapshot is cached as "pending"; the
//! worker picks it up on its next cycle and forwards it to the sink.
//!
//! Errors raised by the probe are logged and swallowed here; the arrival
//! callback runs inside the capture source's dispatch loop and must always
//! return normally.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::source::StatisticsProbe;
use crate::types::StatisticsSnapshot;

struct ThrottleState {
    last_refresh: Instant,
    pending: Option<StatisticsSnapshot>,
}

/// Limits statistics refreshes to at most one per fixed interval.
pub struct StatsThrottle {
    interval: Duration,
    state: Mutex<ThrottleState>,
}

impl StatsThrottle {
    /// Create a throttle; the interval starts counting immediately, matching
    /// the initial snapshot the session pushes at start.
    pub fn new(interval: Duration) -> Self {
        Self::new_at(interval, Instant::now())
    }

    fn new_at(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            state: Mutex::new(ThrottleState { last_refresh: now, pending: None }),
        }
    }

    /// Arrival-path hook: pull a fresh snapshot if the interval has elapsed.
    ///
    /// Cheap when the interval has not elapsed (one short lock, no probe
    /// call). Called from whatever thread the capture source dispatches on.
    pub fn on_arrival(&self, probe: &dyn StatisticsProbe) {
        self.arm_at(Instant::now(), probe);
    }

    fn arm_at(&self, now: Instant, probe: &dyn StatisticsProbe) {
        let mut state = self.lock();
        if now.duration_since(state.last_refresh) <= self.interval {
            return;
        }
        // Stamp before pulling so a failing probe is retried at most once per
        // interval, not once per arrival.
        state.last_refresh = now;
        match probe.statistics() {
            Ok(snapshot) => state.pending = Some(snapshot),
            Err(e) => warn!("statistics refresh failed: {e}"),
        }
    }

    /// Worker-side hook: take the cached snapshot if one is pending, clearing
    /// the pending flag.
    pub fn take_pending(&self) -> Option<StatisticsSnapshot> {
        self.lock().pending.take()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ThrottleState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
