//! Time management for the guidance session
//!
//! Provides a clock abstraction so the session can be driven by:
//! - System clock (when available)
//! - A host-supplied clock (e.g. a browser's `Date.now()` bridged in)
//! - A fixed, manually advanced clock in tests
//!
//! The Moon's position is time dependent, and calibration has a bounded
//! wait, so every time-sensitive decision in the session goes through the
//! injected [`TimeSource`].

use core::cell::Cell;

/// Timestamp in milliseconds since the Unix epoch (or an arbitrary origin for tests)
pub type Timestamp = u64;

/// Source of time for the session
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs a test or monotonic clock)
    fn is_wall_clock(&self) -> bool;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing
///
/// Interior mutability lets a test keep a shared reference to the clock
/// while a session borrows it, and still advance time between events.
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Cell<Timestamp>,
}

impl FixedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: Cell::new(timestamp) }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get().saturating_add(ms));
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Milliseconds elapsed between two timestamps, zero if the clock went backwards
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}
