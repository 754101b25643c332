//! Scheduler lifecycle tests for tt-sch
