//! Scheduler configuration
//!
//! Run-time settings are collected in [`SchedulerConfig`]. The task table
//! capacity is a const generic on the scheduler itself and never changes
//! after construction.

use crate::{TickRate, TtResult};

/// Default tick frequency in Hz (1 ms tick)
pub const DEFAULT_TICK_RATE_HZ: u32 = 1000;

/// Default ceiling on undelivered ticks before overrun is latched
pub const DEFAULT_TICK_COUNT_LIMIT: u32 = 10;

/// Default task table capacity for hosts that do not pick their own
pub const DEFAULT_MAX_TASKS: usize = 8;

/// Run-time scheduler settings applied by `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Rate at which the tick source delivers ticks
    pub tick_rate: TickRate,
    /// Backlog above which the overrun latch is set
    pub tick_count_limit: u32,
}

impl SchedulerConfig {
    /// Create a configuration for the given tick rate with the default
    /// overrun ceiling
    pub const fn new(tick_rate: TickRate) -> Self {
        Self {
            tick_rate,
            tick_count_limit: DEFAULT_TICK_COUNT_LIMIT,
        }
    }

    /// Create a configuration from a raw frequency in Hz
    pub const fn from_hz(hz: u32) -> TtResult<Self> {
        match TickRate::from_hz(hz) {
            Ok(rate) => Ok(Self::new(rate)),
            Err(err) => Err(err),
        }
    }

    /// Set the overrun ceiling
    pub const fn with_tick_count_limit(mut self, limit: u32) -> Self {
        self.tick_count_limit = limit;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_rate: TickRate(DEFAULT_TICK_RATE_HZ),
            tick_count_limit: DEFAULT_TICK_COUNT_LIMIT,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SchedulerConfig {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "SchedulerConfig{{rate: {}, limit: {}}}",
            self.tick_rate,
            self.tick_count_limit
        );
    }
}
