//! VK method API client
//!
//! # Architecture
//!
//! - [`VkClient`] validates calls, attaches credentials and routes every call
//!   through one `CallScheduler`
//! - [`RemoteInvoker`] performs a single call; [`HttpInvoker`] is the
//!   reqwest-backed implementation
//! - [`PageCollector`] walks list-shaped methods page by page and
//!   [`aggregate`] folds the pages into one result
//! - Credential exchange (`site_auth`, `server_auth`) bypasses the scheduler
//!
//! Failures are surfaced as [`vkclient_domain::VkError`] and never retried.

pub mod aggregate;
pub mod auth;
pub mod client;
pub mod collect;
pub mod invoker;
pub mod methods;

pub use aggregate::aggregate;
pub use client::{VkClient, VkClientBuilder};
pub use collect::{CollectorState, PageCollector};
pub use invoker::{unwrap_envelope, HttpInvoker, RemoteInvoker};
pub use methods::{is_in_scope, is_method, is_open_method};
