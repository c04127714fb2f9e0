//! Capture statistics and stop status

use std::time::SystemTime;

/// Point-in-time capture counters pulled from the capture source.
///
/// Counters are monotonically non-decreasing within one session. Snapshots are
/// pulled at most once per throttle interval regardless of arrival rate; see
/// [`crate::throttle::StatsThrottle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    /// Packets received by the device
    pub received: u64,

    /// Packets dropped by the device, plus any frames dropped by a bounded
    /// intake queue by the time the snapshot is forwarded
    pub dropped: u64,

    /// When this snapshot was taken
    pub captured_at: SystemTime,
}

impl StatisticsSnapshot {
    /// Build a snapshot stamped with the current time.
    pub fn now(received: u64, dropped: u64) -> Self {
        Self { received, dropped, captured_at: SystemTime::now() }
    }
}

/// Status reported by the capture source's stopped callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopStatus {
    /// Capture ended normally
    Completed,
    /// The device reported an error while capturing
    DeviceError,
}

impl StopStatus {
    /// Whether this status represents a clean shutdown.
    pub fn is_clean(self) -> bool {
        matches!(self, StopStatus::Completed)
    }
}

impl std::fmt::Display for StopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopStatus::Completed => write!(f, "completed without error"),
            StopStatus::DeviceError => write!(f, "device reported an error"),
        }
    }
}
