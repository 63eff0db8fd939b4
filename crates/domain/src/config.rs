//! Configuration structures
//!
//! Every section has defaults, so an empty file (or no file at all) yields a
//! client that can call open methods against the public endpoints.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AUTH_ENDPOINT, DEFAULT_API_VERSION, DEFAULT_CALL_INTERVAL_MS, DEFAULT_TIMEOUT_SECS,
    METHODS_ENDPOINT, TOKEN_ENDPOINT,
};
use crate::types::Scope;

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app: AppCredentials,
    pub options: ClientOptions,
    pub endpoints: Endpoints,
    pub logging: LoggingConfig,
}

/// Registered application identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: Scope,
    pub api_version: String,
}

impl Default for AppCredentials {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            scope: Scope::empty(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

/// Transport and pacing options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Minimum spacing between method calls, in milliseconds
    pub interval_ms: u64,
    /// Per-request HTTP timeout, in seconds
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_CALL_INTERVAL_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Remote endpoints (overridable for tests and proxies)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub auth: String,
    pub token: String,
    pub methods: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth: AUTH_ENDPOINT.to_string(),
            token: TOKEN_ENDPOINT.to_string(),
            methods: METHODS_ENDPOINT.to_string(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".to_string(), json: false }
    }
}
