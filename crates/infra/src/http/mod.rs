//! HTTP transport shared by method calls and credential exchange

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
