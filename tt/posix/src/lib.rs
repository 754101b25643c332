//! POSIX port of the time-triggered scheduler.
//!
//! Provides a thread-backed [`PosixTicker`] standing in for the hardware
//! tick timer, so that scheduler applications can run and be tested on a
//! Linux/Unix host, plus a small stderr [`logger`].

pub mod logger;
pub mod time;

pub use time::{PosixTicker, TickerError, MAX_TICK_RATE_HZ};
