#![no_std]
#![forbid(unsafe_code)]

//! # TT Scheduler Kernel
//!
//! A cooperative, time-triggered scheduler. A hardware tick interrupt feeds
//! a backlog counter; the host's main loop calls
//! [`Scheduler::dispatch`], which drains that backlog and releases every
//! periodic task that has become due. Tasks run to completion, one at a
//! time, in a fixed order. If the backlog ever grows past a configured
//! ceiling the overrun latch is set and stays set until the next `start`.
//!
//! ```ignore
//! static TICKS: TickCounter = TickCounter::new();
//!
//! let mut sched: Scheduler<'_, _, 4> = Scheduler::new(timer, &TICKS);
//! sched.init(SchedulerConfig::from_hz(1000)?)?;
//! sched.add_task(&mut read_imu, 0, 1)?;
//! sched.add_task(&mut telemetry, 5, 100)?;
//! sched.start()?;
//! loop {
//!     if sched.dispatch() {
//!         safe_shutdown();
//!     }
//!     tt_sch::wait_for_tick();
//! }
//! ```

pub mod scheduler;
pub mod source;
pub mod table;
pub mod tick;

pub use tt_core::*;
pub use scheduler::*;
pub use source::*;
pub use table::*;
pub use tick::*;

#[cfg(test)]
mod tests;

/// Idle until the next interrupt
///
/// Call after [`Scheduler::dispatch`] has drained the backlog.
#[inline]
pub fn wait_for_tick() {
    #[cfg(target_arch = "arm")]
    {
        // Wait for interrupt on ARM
        cortex_m::asm::wfi();
    }
    #[cfg(not(target_arch = "arm"))]
    {
        core::hint::spin_loop();
    }
}
