//! Output Ring Buffer
//!
//! Provides a fixed-capacity circular byte store used to queue serial
//! responses. Writers never overwrite unread bytes and never block; the
//! transport drains contiguous spans at its own pace.

mod buffer;

pub use buffer::{OutputRing, DEFAULT_CAPACITY};

use serde::{Deserialize, Serialize};

/// Snapshot of ring occupancy and traffic counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingStats {
    /// Bytes written but not yet drained
    pub occupied: usize,
    /// Size of the backing storage (one slot is always kept free)
    pub capacity: usize,
    /// Bytes accepted by `put` since construction
    pub total_written: u64,
    /// Bytes refused by `put` because the ring was full
    pub rejected: u64,
}
