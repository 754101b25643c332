//! Time base types: tick rate, per-task counters and tick backlog

use core::fmt;
use crate::{TtError, TtResult};

/// Nanoseconds per second
const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Frequency of the hardware tick, in Hz
///
/// Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TickRate(pub(crate) u32);

impl TickRate {
    /// Create a tick rate from a frequency in Hz
    pub const fn from_hz(hz: u32) -> TtResult<Self> {
        if hz == 0 {
            Err(TtError::InvalidTickRate)
        } else {
            Ok(Self(hz))
        }
    }

    /// Get the frequency in Hz
    pub const fn hz(self) -> u32 {
        self.0
    }

    /// Length of one tick in nanoseconds
    pub const fn period_nanos(self) -> u64 {
        NSEC_PER_SEC / self.0 as u64
    }

    /// Convert a number of milliseconds into whole ticks at this rate
    ///
    /// Rounds down; anything shorter than one tick yields zero. Durations
    /// too long to count in a `u32` saturate at `u32::MAX`.
    pub const fn ticks_from_millis(self, millis: u32) -> u32 {
        let ticks = (millis as u64 * self.0 as u64) / 1000;
        if ticks > u32::MAX as u64 {
            u32::MAX
        } else {
            ticks as u32
        }
    }
}

impl fmt::Display for TickRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickRate {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}Hz", self.0);
    }
}

/// Per-task tick counter, used for both the remaining delay and the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TaskCounter(u32);

impl TaskCounter {
    /// Create a new counter
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    /// Get the raw tick count
    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Check if the counter is zero
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Decrement the counter by one tick
    ///
    /// Returns `true` if this decrement brought the counter to zero. A
    /// counter that is already zero stays at zero and returns `false`.
    pub fn decrement(&mut self) -> bool {
        if self.0 > 0 {
            self.0 -= 1;
            self.0 == 0
        } else {
            false
        }
    }
}

impl fmt::Display for TaskCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ticks", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TaskCounter {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}ticks", self.0);
    }
}

/// Number of ticks delivered by the tick source but not yet drained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Backlog(u32);

impl Backlog {
    /// Empty backlog
    pub const ZERO: Self = Self(0);

    /// Create a backlog snapshot
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    /// Get the raw tick count
    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Check if there is nothing left to drain
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Record one more delivered tick
    ///
    /// Saturates at `u32::MAX` rather than wrapping back to an empty backlog.
    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    /// Record one drained tick, returning `true` if ticks remain
    pub fn decrement(&mut self) -> bool {
        self.0 = self.0.saturating_sub(1);
        self.0 > 0
    }

    /// Check whether the backlog has grown past a ceiling
    pub const fn exceeds(self, limit: u32) -> bool {
        self.0 > limit
    }
}

impl fmt::Display for Backlog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backlog:{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Backlog {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "backlog:{}", self.0);
    }
}
