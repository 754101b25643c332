//! Contract for the hardware timer that drives the scheduler

use tt_core::{TickRate, TtResult};

use crate::TickHandler;

/// A periodic timer that calls a registered [`TickHandler`] once per tick
///
/// The scheduler only touches its tick source from `init`, `start` and
/// `stop`. Implementations guarantee that the handler is invoked at the
/// configured rate while enabled, and never once [`disable`](Self::disable)
/// has returned.
pub trait TickSource {
    /// Install the handler to call on every tick
    fn register_tick_callback(&mut self, handler: &'static dyn TickHandler);

    /// Set the tick frequency
    ///
    /// Fails with [`TtError::InvalidTickRate`](tt_core::TtError::InvalidTickRate)
    /// if the timer cannot produce the requested rate.
    fn configure(&mut self, rate: TickRate) -> TtResult<()>;

    /// Start delivering ticks
    fn enable(&mut self);

    /// Stop delivering ticks; no handler call is in flight once this returns
    fn disable(&mut self);
}
