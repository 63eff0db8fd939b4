//! Access token session

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// When a session stops being usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    /// Offline tokens (`expires_in == 0`) never expire
    Never,
    /// Absolute expiration timestamp (UTC)
    At(DateTime<Utc>),
}

/// Token state owned by a client
///
/// Replaced wholesale by a successful credential exchange; read before every
/// authenticated call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Option<i64>,
    pub expires: Expiry,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>, user_id: Option<i64>, expires: Expiry) -> Self {
        Self { token: token.into(), user_id, expires }
    }

    /// Build a session from a token endpoint response received at `now`.
    #[must_use]
    pub fn from_token_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let expires = if response.expires_in == 0 {
            Expiry::Never
        } else {
            Expiry::At(now + Duration::seconds(response.expires_in))
        };

        Self { token: response.access_token, user_id: response.user_id, expires }
    }

    /// Check whether the token can be attached to a call made at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() {
            return false;
        }
        match self.expires {
            Expiry::Never => true,
            Expiry::At(expires_at) => expires_at > now,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Seconds until expiry, `None` for sessions that never expire.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        match self.expires {
            Expiry::Never => None,
            Expiry::At(expires_at) => Some((expires_at - Utc::now()).num_seconds()),
        }
    }
}

/// Successful body of the `access_token` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Lifetime in seconds; `0` means the token does not expire
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
