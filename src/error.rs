//! Error types for the capture pipeline.
//!
//! All errors implement `std::error::Error` and carry enough context to be
//! surfaced directly to a user. Session lifecycle failures are returned
//! synchronously from [`crate::session::CaptureSession`] calls; failures on
//! the arrival path are logged and never propagate back into the capture
//! source (see the module docs on [`crate::throttle`]).
//!
//! Errors classify themselves as recoverable or not:
//!
//! ```rust
//! use tapline::CaptureError;
//!
//! let error = CaptureError::NoDeviceSelected;
//! if error.is_recoverable() {
//!     // re-prompt for a device and try again
//! }
//! ```

use thiserror::Error;

use crate::types::StopStatus;

/// Result type alias for capture pipeline operations.
pub type Result<T, E = CaptureError> = std::result::Result<T, E>;

/// Main error type for capture pipeline operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CaptureError {
    /// A start was requested with no capture device selected.
    #[error("no capture device selected")]
    NoDeviceSelected,

    /// A start was requested while a capture session is already active.
    #[error("capture is already running")]
    AlreadyCapturing,

    /// The capture device could not be opened.
    #[error("failed to open capture device: {reason}")]
    DeviceOpen {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The device opened but capture could not be started.
    #[error("failed to start capture: {reason}")]
    CaptureStart {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The capture source reported that capture stopped abnormally.
    #[error("capture stopped abnormally: {status}")]
    AbnormalStop { status: StopStatus },

    /// The capture source could not produce a statistics snapshot.
    #[error("failed to read capture statistics: {reason}")]
    Statistics {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CaptureError {
    /// Returns whether the session can reasonably retry after this error.
    ///
    /// `NoDeviceSelected` and `AlreadyCapturing` are caller-state errors that
    /// clear themselves once the caller selects a device or stops the running
    /// session. Device failures are recoverable in the sense that the session
    /// rolls back to Idle and a new start may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CaptureError::NoDeviceSelected => true,
            CaptureError::AlreadyCapturing => true,
            CaptureError::DeviceOpen { .. } => true,
            CaptureError::CaptureStart { .. } => true,
            CaptureError::AbnormalStop { .. } => true,
            CaptureError::Statistics { .. } => true,
        }
    }

    /// Helper constructor for device open failures.
    pub fn device_open(reason: impl Into<String>) -> Self {
        CaptureError::DeviceOpen { reason: reason.into(), source: None }
    }

    /// Helper constructor for device open failures with an underlying cause.
    pub fn device_open_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        CaptureError::DeviceOpen { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for capture start failures.
    pub fn capture_start(reason: impl Into<String>) -> Self {
        CaptureError::CaptureStart { reason: reason.into(), source: None }
    }

    /// Helper constructor for statistics read failures.
    pub fn statistics(reason: impl Into<String>) -> Self {
        CaptureError::Statistics { reason: reason.into(), source: None }
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::DeviceOpen { reason: err.to_string(), source: Some(Box::new(err)) }
    }
}
