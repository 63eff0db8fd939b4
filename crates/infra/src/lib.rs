//! # vkclient infrastructure
//!
//! I/O side of the client: the HTTP transport, the paced API client with
//! its pagination collector, credential exchange, configuration loading and
//! log setup.
//!
//! ## Architecture
//! - Depends on `vkclient-domain` for types and `vkclient-common` for the
//!   call scheduler
//! - Contains all network and filesystem access

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used items
pub use api::{CollectorState, HttpInvoker, PageCollector, RemoteInvoker, VkClient};
pub use errors::InfraError;
pub use http::HttpClient;
