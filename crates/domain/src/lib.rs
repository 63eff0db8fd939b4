//! # vkclient domain
//!
//! Data types shared by the scheduler, the collector and the HTTP layer.
//!
//! This crate contains:
//! - The error type and `Result` alias
//! - Configuration structures
//! - Session, scope and pagination types
//! - Endpoint and pacing constants
//!
//! ## Architecture
//! - No dependencies on other vkclient crates
//! - No I/O; pure data and small pure helpers

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
