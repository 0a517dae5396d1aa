/*!
 * Event Log
 * Bounded, tick-stamped, append-only log backed by a ringbuf circular buffer
 */

use crate::core::types::Tick;
use ringbuf::{traits::*, HeapRb};
use std::fmt;

/// Bounded event log; once full, the oldest entry is overwritten
pub struct EventLog {
    buffer: HeapRb<String>,
    capacity: usize,
    total: u64,
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("capacity", &self.capacity)
            .field("buffered", &self.buffer.occupied_len())
            .field("total", &self.total)
            .finish()
    }
}

impl EventLog {
    /// Create a log holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: HeapRb::new(capacity),
            capacity,
            total: 0,
        }
    }

    /// Append `[T###] message`
    pub fn record(&mut self, tick: Tick, message: impl fmt::Display) {
        self.buffer.push_overwrite(format!("[T{:03}] {}", tick, message));
        self.total += 1;
    }

    /// Entries oldest first
    pub fn entries(&self) -> Vec<String> {
        self.buffer.iter().cloned().collect()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&String> {
        self.buffer.iter().last()
    }

    pub fn len(&self) -> usize {
        self.buffer.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries ever recorded, including overwritten ones
    pub fn total_recorded(&self) -> u64 {
        self.total
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.total = 0;
    }
}
