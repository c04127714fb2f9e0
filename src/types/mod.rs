//! Core types for the capture delivery pipeline.
//!
//! This module provides the data that flows through the system:
//! - [`RawFrame`] is one captured unit of network data plus its metadata
//! - [`DeliveryRecord`] wraps a frame with the sequence number assigned at
//!   drain time and the derived fields a consumer needs without re-parsing
//! - [`StatisticsSnapshot`] carries the device's received/dropped counters
//! - [`StopStatus`] is the status reported by the capture source when a
//!   capture ends
//!
//! Frame payloads are shared zero-copy via `Arc<[u8]>`; cloning a frame or a
//! record never copies packet bytes.

mod frame;
mod record;
mod stats;

pub use frame::{LinkLayer, RawFrame};
pub use record::DeliveryRecord;
pub use stats::{StatisticsSnapshot, StopStatus};
