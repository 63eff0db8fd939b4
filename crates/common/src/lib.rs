//! Runtime utilities shared across vkclient crates.
//!
//! Currently this is the pacing primitive that keeps every outgoing call of
//! one client on a single timeline ([`resilience::CallScheduler`]).

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod resilience;

pub use resilience::CallScheduler;
