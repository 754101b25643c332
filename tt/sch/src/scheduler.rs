//! The time-triggered scheduler: registration, start/stop and dispatch

use tt_core::{Backlog, SchedulerConfig, Task, TtError, TtResult};

use crate::{TaskTable, TickCounter, TickSource};

/// Running totals kept by the dispatcher since the last `start`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Ticks drained from the tick counter
    pub ticks: u64,
    /// Task releases (one per task run)
    pub releases: u64,
}

#[cfg(feature = "defmt")]
impl defmt::Format for DispatchStats {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "DispatchStats{{ticks: {}, releases: {}}}", self.ticks, self.releases);
    }
}

/// Cooperative time-triggered scheduler
///
/// Owns a fixed table of `N` periodic tasks and drains the backlog that the
/// tick source accumulates in a shared [`TickCounter`]. Tasks run
/// synchronously from [`dispatch`](Self::dispatch), which the host calls
/// repeatedly from its main loop.
pub struct Scheduler<'a, S: TickSource, const N: usize> {
    /// Hardware timer delivering ticks
    source: S,
    /// Backlog shared with the tick handler
    ticks: &'static TickCounter,
    /// Registered tasks
    tasks: TaskTable<'a, N>,
    /// Configuration applied by the last `init`
    config: Option<SchedulerConfig>,
    /// Whether the tick source is currently enabled
    running: bool,
    /// Dispatcher totals since the last `start`
    stats: DispatchStats,
    /// Whether overrun has already been logged since the last `start`
    #[cfg(feature = "defmt")]
    overrun_reported: bool,
}

impl<'a, S: TickSource, const N: usize> Scheduler<'a, S, N> {
    /// Create a scheduler driven by `source` and sharing `ticks` with it
    pub const fn new(source: S, ticks: &'static TickCounter) -> Self {
        Self {
            source,
            ticks,
            tasks: TaskTable::new(),
            config: None,
            running: false,
            stats: DispatchStats { ticks: 0, releases: 0 },
            #[cfg(feature = "defmt")]
            overrun_reported: false,
        }
    }

    /// Initialize the scheduler
    ///
    /// Configures the tick rate, then clears the task table, hooks the tick
    /// counter into the tick source and applies the overrun ceiling. Must be
    /// called while stopped. If the tick source rejects the rate, nothing
    /// else is changed.
    pub fn init(&mut self, config: SchedulerConfig) -> TtResult<()> {
        if self.running {
            return Err(TtError::Running);
        }

        self.source.configure(config.tick_rate)?;
        self.source.register_tick_callback(self.ticks);
        self.tasks.clear();
        self.ticks.set_limit(config.tick_count_limit);
        self.config = Some(config);

        #[cfg(feature = "defmt")]
        defmt::info!("scheduler init: {}, {} slots", config, N);
        Ok(())
    }

    /// Register a periodic task
    ///
    /// The task first runs once `initial_delay` ticks have been drained and
    /// every `period` ticks after that, forever. Returns the slot it was
    /// placed in. Registration is only allowed while stopped.
    pub fn add_task(
        &mut self,
        handle: &'a mut dyn Task,
        initial_delay: u32,
        period: u32,
    ) -> TtResult<usize> {
        if self.running {
            return Err(TtError::Running);
        }

        let result = self.tasks.add(handle, initial_delay, period);

        #[cfg(feature = "defmt")]
        match result {
            Ok(id) => defmt::debug!(
                "task added in slot {}: delay {}, period {}",
                id,
                initial_delay,
                period
            ),
            Err(err) => defmt::error!("task rejected: {}", err),
        }

        result
    }

    /// Start delivering ticks
    ///
    /// Resets the backlog, the overrun latch and the dispatch statistics
    /// before enabling the tick source.
    pub fn start(&mut self) -> TtResult<()> {
        if self.config.is_none() {
            return Err(TtError::NotInitialized);
        }
        if self.running {
            self.source.disable();
        }

        self.ticks.reset();
        self.stats = DispatchStats::default();
        #[cfg(feature = "defmt")]
        {
            self.overrun_reported = false;
        }
        self.running = true;
        self.source.enable();

        #[cfg(feature = "defmt")]
        defmt::info!("scheduler started with {} tasks", self.tasks.occupied());
        Ok(())
    }

    /// Stop delivering ticks
    ///
    /// No tick handler invocation is in flight once this returns.
    pub fn stop(&mut self) {
        self.source.disable();
        self.running = false;

        #[cfg(feature = "defmt")]
        defmt::info!("scheduler stopped: {}", self.stats);
    }

    /// Release every due task for each pending tick
    ///
    /// Drains the backlog to zero, advancing all tasks once per drained tick
    /// in slot order. Tasks run to completion inside this call. Returns the
    /// overrun latch; the caller decides what to do about an overrun. Once
    /// this returns with no backlog the host may idle until the next tick.
    pub fn dispatch(&mut self) -> bool {
        let mut update_required = self.ticks.has_backlog();

        while update_required {
            let released = self.tasks.release_due();
            self.stats.releases += u64::from(released);
            self.stats.ticks += 1;

            update_required = self.ticks.consume();
        }

        let overrun = self.ticks.overrun();

        #[cfg(feature = "defmt")]
        if overrun && !self.overrun_reported {
            self.overrun_reported = true;
            defmt::warn!("scheduler overrun: tick backlog exceeded {}", self.ticks.limit());
        }
        overrun
    }

    /// Check whether the tick source is enabled
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// State of the overrun latch
    pub fn overrun(&self) -> bool {
        self.ticks.overrun()
    }

    /// Ticks waiting to be drained
    pub fn backlog(&self) -> Backlog {
        self.ticks.backlog()
    }

    /// Dispatcher totals since the last `start`
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Configuration applied by the last `init`
    pub fn config(&self) -> Option<SchedulerConfig> {
        self.config
    }

    /// The task table
    pub fn tasks(&self) -> &TaskTable<'a, N> {
        &self.tasks
    }

    /// The tick source
    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(feature = "defmt")]
impl<S: TickSource, const N: usize> defmt::Format for Scheduler<'_, S, N> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Scheduler{{running: {}, tasks: {}/{}, {}}}",
            self.running,
            self.tasks.occupied(),
            N,
            self.ticks
        );
    }
}
