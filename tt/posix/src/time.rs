//! Clock Tick Service for POSIX
//!
//! Stands in for the hardware tick timer on a host. A dedicated ticker
//! thread calls the registered handler at the configured rate, using
//! absolute deadlines on the monotonic clock so that ticks do not drift.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tt_core::{TickRate, TtError, TtResult};
use tt_sch::{TickHandler, TickSource};

/// Highest tick rate the ticker thread can sustain
pub const MAX_TICK_RATE_HZ: u32 = 10_000;

/// Errors raised while starting the ticker thread
#[derive(Debug, Error)]
pub enum TickerError {
    #[error("no tick handler registered")]
    NoHandler,
    #[error("failed to spawn ticker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Tick source backed by a ticker thread
pub struct PosixTicker {
    handler: Option<&'static dyn TickHandler>,
    period: Duration,
    running: Arc<AtomicBool>,
    delivered: Arc<AtomicU64>,
    thread: Option<JoinHandle<()>>,
}

impl PosixTicker {
    /// Create a stopped ticker at the default 1 kHz rate
    pub fn new() -> Self {
        Self {
            handler: None,
            period: Duration::from_millis(1),
            running: Arc::new(AtomicBool::new(false)),
            delivered: Arc::new(AtomicU64::new(0)),
            thread: None,
        }
    }

    /// Time between two ticks
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total number of handler calls made since this ticker was created
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }

    /// Check whether the ticker thread is running
    pub fn is_enabled(&self) -> bool {
        self.thread.is_some()
    }

    /// Start the ticker thread, reporting why it could not be started
    pub fn try_enable(&mut self) -> Result<(), TickerError> {
        if self.thread.is_some() {
            return Ok(());
        }
        let handler = self.handler.ok_or(TickerError::NoHandler)?;

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let delivered = Arc::clone(&self.delivered);
        let period = self.period;

        let spawned = thread::Builder::new()
            .name("tt-ticker".into())
            .spawn(move || ticker_thread(handler, period, &running, &delivered));

        match spawned {
            Ok(handle) => {
                log::debug!("ticker started, period {:?}", period);
                self.thread = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.running.store(false, Ordering::SeqCst);
                Err(err.into())
            }
        }
    }
}

impl Default for PosixTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for PosixTicker {
    fn register_tick_callback(&mut self, handler: &'static dyn TickHandler) {
        self.handler = Some(handler);
    }

    fn configure(&mut self, rate: TickRate) -> TtResult<()> {
        if rate.hz() > MAX_TICK_RATE_HZ {
            log::error!("tick rate {} above ticker limit of {}Hz", rate, MAX_TICK_RATE_HZ);
            return Err(TtError::InvalidTickRate);
        }
        self.period = Duration::from_nanos(rate.period_nanos());
        Ok(())
    }

    fn enable(&mut self) {
        if let Err(err) = self.try_enable() {
            log::error!("ticker not started: {err}");
        }
    }

    fn disable(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        // Joining guarantees the handler is not running any more
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                log::error!("ticker thread panicked");
            }
            log::debug!("ticker stopped after {} ticks", self.delivered());
        }
    }
}

impl Drop for PosixTicker {
    fn drop(&mut self) {
        self.disable();
    }
}

/// Ticker thread implementation
///
/// Sleeps until the next absolute deadline rather than for a relative
/// duration. When the thread falls behind it delivers the missed ticks
/// back to back.
fn ticker_thread(
    handler: &'static dyn TickHandler,
    period: Duration,
    running: &AtomicBool,
    delivered: &AtomicU64,
) {
    let mut next_tick = Instant::now();

    while running.load(Ordering::Relaxed) {
        next_tick += period;

        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        }

        if !running.load(Ordering::Relaxed) {
            break;
        }
        handler.on_tick();
        delivered.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CountingHandler(AtomicUsize);

    impl TickHandler for CountingHandler {
        fn on_tick(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_configure_period() {
        let mut ticker = PosixTicker::new();
        ticker.configure(TickRate::from_hz(100).unwrap()).unwrap();
        assert_eq!(ticker.period(), Duration::from_millis(10));

        ticker.configure(TickRate::from_hz(1000).unwrap()).unwrap();
        assert_eq!(ticker.period(), Duration::from_micros(1000));
    }

    #[test]
    fn test_rate_above_limit_is_rejected() {
        let mut ticker = PosixTicker::new();
        let rate = TickRate::from_hz(MAX_TICK_RATE_HZ + 1).unwrap();
        assert_eq!(ticker.configure(rate), Err(TtError::InvalidTickRate));
        assert_eq!(ticker.period(), Duration::from_millis(1));
    }

    #[test]
    fn test_enable_without_handler() {
        let mut ticker = PosixTicker::new();
        assert!(matches!(ticker.try_enable(), Err(TickerError::NoHandler)));
        assert!(!ticker.is_enabled());
    }

    #[test]
    fn test_ticker_thread() {
        static HANDLER: CountingHandler = CountingHandler(AtomicUsize::new(0));

        let mut ticker = PosixTicker::new();
        ticker.register_tick_callback(&HANDLER);
        ticker.configure(TickRate::from_hz(100).unwrap()).unwrap();
        ticker.enable();
        assert!(ticker.is_enabled());

        // Let it run for ~100ms
        thread::sleep(Duration::from_millis(100));

        ticker.disable();
        assert!(!ticker.is_enabled());

        let count = HANDLER.0.load(Ordering::SeqCst);
        // Should have approximately 10 ticks (100ms / 10ms)
        assert!((5..=20).contains(&count), "Expected ~10 ticks, got {}", count);
        assert_eq!(count as u64, ticker.delivered());

        // No ticks after disable returns
        thread::sleep(Duration::from_millis(30));
        assert_eq!(HANDLER.0.load(Ordering::SeqCst), count);
    }
}
