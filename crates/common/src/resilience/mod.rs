//! Resilience patterns for talking to rate-limited services
//!
//! The remote API rejects clients that exceed a fixed call rate, so instead
//! of rejecting work locally (token/leaky buckets) calls are *delayed* onto a
//! shared timeline. Failures are never retried here; the scheduler only
//! decides when a call may start.

pub mod scheduler;

pub use scheduler::CallScheduler;
