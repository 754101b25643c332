//! Task abstraction and task descriptors

use core::fmt;
use crate::TaskCounter;

/// A periodic unit of work released by the scheduler
///
/// Tasks take no arguments and return nothing. They run to completion on
/// every release and must finish well within one tick period.
pub trait Task {
    /// Run the task once
    fn run(&mut self);
}

impl<F> Task for F
where
    F: FnMut(),
{
    fn run(&mut self) {
        self()
    }
}

/// A registered task together with its release timing
///
/// `delay` counts down the ticks until the next release; `period` is what
/// it is reloaded with after every release.
pub struct TaskDescriptor<'a> {
    handle: &'a mut dyn Task,
    delay: TaskCounter,
    period: TaskCounter,
}

impl<'a> TaskDescriptor<'a> {
    /// Create a descriptor for a task first released after `initial_delay`
    /// drained ticks and every `period` ticks after that
    ///
    /// The stored delay is biased by one because [`release`](Self::release)
    /// decrements before testing for zero. The caller guarantees `period > 0`.
    pub fn new(handle: &'a mut dyn Task, initial_delay: u32, period: u32) -> Self {
        Self {
            handle,
            delay: TaskCounter::new(initial_delay.saturating_add(1)),
            period: TaskCounter::new(period),
        }
    }

    /// Ticks left before the next release
    pub fn delay(&self) -> TaskCounter {
        self.delay
    }

    /// Reload value applied after every release
    pub fn period(&self) -> TaskCounter {
        self.period
    }

    /// Advance this task by one tick
    ///
    /// Runs the task to completion if it became due and reschedules it.
    /// Returns `true` if the task ran.
    pub fn release(&mut self) -> bool {
        if self.delay.decrement() {
            self.handle.run();
            self.delay = self.period;
            true
        } else {
            false
        }
    }
}

impl fmt::Debug for TaskDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("delay", &self.delay)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TaskDescriptor<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Task{{delay: {}, period: {}}}", self.delay, self.period);
    }
}
