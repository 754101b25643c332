#![no_std]
#![forbid(unsafe_code)]

//! # TT Core
//!
//! Core types, traits, and configuration for the time-triggered cooperative
//! scheduler. This crate provides the vocabulary shared by the scheduler
//! kernel and the platform ports: tick rates and counters, the task
//! abstraction, and the error taxonomy.

#[cfg(feature = "std")]
extern crate std;

use core::fmt;

pub mod config;
pub mod task;
pub mod time;

pub use config::*;
pub use task::*;
pub use time::*;

/// Scheduler crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the scheduler
pub type TtResult<T> = Result<T, TtError>;

/// Error types for scheduler operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtError {
    /// Task table has no free slot
    TableFull,
    /// Task period was zero (one-shot tasks are not supported)
    InvalidPeriod,
    /// Tick rate is zero or outside what the tick source supports
    InvalidTickRate,
    /// Scheduler was started before being initialized
    NotInitialized,
    /// Operation is only allowed while the scheduler is stopped
    Running,
}

impl fmt::Display for TtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtError::TableFull => write!(f, "Task table is full"),
            TtError::InvalidPeriod => write!(f, "Task period must be greater than zero"),
            TtError::InvalidTickRate => write!(f, "Invalid tick rate"),
            TtError::NotInitialized => write!(f, "Scheduler not initialized"),
            TtError::Running => write!(f, "Scheduler is running"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TtError {}

#[cfg(feature = "defmt")]
impl defmt::Format for TtError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TtError::TableFull => defmt::write!(fmt, "TableFull"),
            TtError::InvalidPeriod => defmt::write!(fmt, "InvalidPeriod"),
            TtError::InvalidTickRate => defmt::write!(fmt, "InvalidTickRate"),
            TtError::NotInitialized => defmt::write!(fmt, "NotInitialized"),
            TtError::Running => defmt::write!(fmt, "Running"),
        }
    }
}
