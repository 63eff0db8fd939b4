//! Endpoint and pacing constants

/// OAuth authorization dialog.
pub const AUTH_ENDPOINT: &str = "https://oauth.vk.com/authorize";
/// OAuth token exchange endpoint.
pub const TOKEN_ENDPOINT: &str = "https://oauth.vk.com/access_token";
/// Base URL for method calls; the method name is appended as a path segment.
pub const METHODS_ENDPOINT: &str = "https://api.vk.com/method";

/// API version sent as `v` when the caller does not supply one.
pub const DEFAULT_API_VERSION: &str = "5.37";

/// Minimum spacing between two outgoing method calls (three calls per second).
pub const DEFAULT_CALL_INTERVAL_MS: u64 = 333;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Parameter names with special meaning for the collector
pub const PARAM_OFFSET: &str = "offset";
pub const PARAM_COUNT: &str = "count";
pub const PARAM_VERSION: &str = "v";
pub const PARAM_ACCESS_TOKEN: &str = "access_token";

// Response envelope keys
pub const ENVELOPE_RESPONSE: &str = "response";
pub const ENVELOPE_ERROR: &str = "error";
pub const FIELD_ITEMS: &str = "items";
pub const FIELD_COUNT: &str = "count";
