//! Output Ring Buffer Implementation

use crate::RingStats;

/// Default backing storage size in bytes
pub const DEFAULT_CAPACITY: usize = 2048;

/// Fixed-capacity byte ring with independent write and drain cursors.
///
/// One slot is always left unused so that `write == drain` unambiguously
/// means empty; the ring therefore holds at most `N - 1` bytes.
pub struct OutputRing<const N: usize = DEFAULT_CAPACITY> {
    /// Backing storage, never reallocated
    storage: [u8; N],
    /// Next slot `put` will fill
    write: usize,
    /// Oldest byte not yet handed off by the transport
    drain: usize,
    /// Bytes accepted since construction
    total_written: u64,
    /// Bytes refused because the ring was full
    rejected: u64,
}

impl<const N: usize> OutputRing<N> {
    const MIN_CAPACITY: () = assert!(N >= 2, "OutputRing needs at least two slots");

    /// Create an empty ring with both cursors at zero
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::MIN_CAPACITY;
        Self {
            storage: [0; N],
            write: 0,
            drain: 0,
            total_written: 0,
            rejected: 0,
        }
    }

    /// Queue one byte.
    ///
    /// Returns `false` without touching the ring when the byte does not fit;
    /// callers are expected to stop writing at that point.
    pub fn put(&mut self, byte: u8) -> bool {
        let next = Self::wrap(self.write + 1);
        if next == self.drain {
            self.rejected += 1;
            return false;
        }
        self.storage[self.write] = byte;
        self.write = next;
        self.total_written += 1;
        true
    }

    /// Contiguous span of queued bytes starting at the drain cursor.
    ///
    /// The span stops at the physical end of storage; once it has been
    /// advanced past, the next call returns the wrapped remainder.
    pub fn pending(&self) -> &[u8] {
        if self.write < self.drain {
            &self.storage[self.drain..]
        } else {
            &self.storage[self.drain..self.write]
        }
    }

    /// Mark `count` bytes as sent.
    ///
    /// Counts beyond the occupied length are clamped so the drain cursor
    /// never passes the write cursor.
    pub fn advance(&mut self, count: usize) {
        let count = count.min(self.len());
        self.drain = Self::wrap(self.drain + count);
    }

    /// Number of queued bytes
    pub fn len(&self) -> usize {
        if self.write >= self.drain {
            self.write - self.drain
        } else {
            N - self.drain + self.write
        }
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.write == self.drain
    }

    /// Check if the next `put` would be refused
    pub fn is_full(&self) -> bool {
        self.len() == N - 1
    }

    /// Size of the backing storage
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes that can still be queued
    pub fn free(&self) -> usize {
        N - 1 - self.len()
    }

    /// Current occupancy and traffic counters
    pub fn stats(&self) -> RingStats {
        RingStats {
            occupied: self.len(),
            capacity: N,
            total_written: self.total_written,
            rejected: self.rejected,
        }
    }

    fn wrap(index: usize) -> usize {
        if index >= N {
            index - N
        } else {
            index
        }
    }
}

impl<const N: usize> Default for OutputRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
