//! Tick counter shared between the tick interrupt and the dispatcher
//!
//! The counter is the only state touched from both execution contexts.
//! Every access below is a single short critical section whose length does
//! not depend on the number of registered tasks.

use core::cell::RefCell;
use critical_section::Mutex;
use tt_core::{Backlog, DEFAULT_TICK_COUNT_LIMIT};

/// Callback invoked by a tick source once per hardware tick
///
/// Implementations run in interrupt context: they must be bounded, must not
/// block, and must not allocate.
pub trait TickHandler: Sync {
    /// Handle one tick
    fn on_tick(&self);
}

struct TickState {
    backlog: Backlog,
    overrun: bool,
    limit: u32,
}

/// Backlog of undelivered ticks plus the sticky overrun latch
///
/// Place it in a `static` so that the tick source can hold a `'static`
/// reference to it.
pub struct TickCounter {
    state: Mutex<RefCell<TickState>>,
}

impl TickCounter {
    /// Create a counter with the default overrun ceiling
    pub const fn new() -> Self {
        Self::with_limit(DEFAULT_TICK_COUNT_LIMIT)
    }

    /// Create a counter with the given overrun ceiling
    pub const fn with_limit(limit: u32) -> Self {
        Self {
            state: Mutex::new(RefCell::new(TickState {
                backlog: Backlog::ZERO,
                overrun: false,
                limit,
            })),
        }
    }

    /// Change the overrun ceiling
    pub fn set_limit(&self, limit: u32) {
        critical_section::with(|cs| {
            self.state.borrow_ref_mut(cs).limit = limit;
        });
    }

    /// Current overrun ceiling
    pub fn limit(&self) -> u32 {
        critical_section::with(|cs| self.state.borrow_ref(cs).limit)
    }

    /// Clear the backlog and the overrun latch
    pub fn reset(&self) {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            state.backlog = Backlog::ZERO;
            state.overrun = false;
        });
    }

    /// Check whether any tick is waiting to be drained
    pub fn has_backlog(&self) -> bool {
        critical_section::with(|cs| !self.state.borrow_ref(cs).backlog.is_empty())
    }

    /// Drain one tick, returning `true` if more ticks are pending
    pub fn consume(&self) -> bool {
        critical_section::with(|cs| self.state.borrow_ref_mut(cs).backlog.decrement())
    }

    /// Snapshot of the backlog
    pub fn backlog(&self) -> Backlog {
        critical_section::with(|cs| self.state.borrow_ref(cs).backlog)
    }

    /// State of the overrun latch
    pub fn overrun(&self) -> bool {
        critical_section::with(|cs| self.state.borrow_ref(cs).overrun)
    }
}

impl TickHandler for TickCounter {
    fn on_tick(&self) {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            state.backlog.increment();
            if state.backlog.exceeds(state.limit) {
                // Tasks took longer than the tick period allows
                state.overrun = true;
            }
        });
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickCounter {
    fn format(&self, fmt: defmt::Formatter) {
        let (backlog, overrun) = critical_section::with(|cs| {
            let state = self.state.borrow_ref(cs);
            (state.backlog, state.overrun)
        });
        defmt::write!(fmt, "TickCounter{{{}, overrun: {}}}", backlog, overrun);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_sets_only_past_ceiling() {
        let counter = TickCounter::with_limit(2);
        counter.on_tick();
        counter.on_tick();
        assert!(!counter.overrun());
        counter.on_tick();
        assert!(counter.overrun());
        assert_eq!(counter.backlog().ticks(), 3);
    }

    #[test]
    fn latch_survives_draining() {
        let counter = TickCounter::with_limit(0);
        counter.on_tick();
        assert!(counter.overrun());
        assert!(!counter.consume());
        assert!(!counter.has_backlog());
        assert!(counter.overrun());
    }

    #[test]
    fn reset_clears_backlog_and_latch() {
        let counter = TickCounter::with_limit(1);
        for _ in 0..5 {
            counter.on_tick();
        }
        assert!(counter.overrun());
        counter.reset();
        assert!(!counter.overrun());
        assert!(counter.backlog().is_empty());
        assert_eq!(counter.limit(), 1);
    }

    #[test]
    fn consume_reports_remaining_ticks() {
        let counter = TickCounter::new();
        counter.on_tick();
        counter.on_tick();
        assert!(counter.has_backlog());
        assert!(counter.consume());
        assert!(!counter.consume());
        assert!(!counter.has_backlog());
    }
}
