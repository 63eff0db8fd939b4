//! Logging setup
//!
//! Structured events are emitted with `tracing` throughout the workspace:
//! `debug!` for scheduling decisions and page progress, `info!` for finished
//! collections and credential exchange, `warn!` for failures and recovered
//! lock poisoning.

pub mod logging;

pub use logging::init;
