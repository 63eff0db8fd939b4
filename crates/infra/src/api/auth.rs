//! Credential acquisition
//!
//! Builds the authorization dialog URL and exchanges an authorization code
//! (site flow) or the application secret (server flow) for an access token.
//! A successful exchange replaces the client's session. Token requests go
//! straight to the token endpoint and do not take a slot on the call
//! timeline.

use chrono::Utc;
use reqwest::Method;
use serde_json::Value;
use tracing::{info, instrument, warn};
use url::Url;
use vkclient_domain::constants::PARAM_VERSION;
use vkclient_domain::{Params, Session, TokenResponse, VkError};

use super::client::VkClient;
use super::invoker::encode_form;
use crate::errors::conversions::status_message;

const PARAM_CLIENT_ID: &str = "client_id";
const PARAM_CLIENT_SECRET: &str = "client_secret";
const PARAM_REDIRECT_URI: &str = "redirect_uri";
const PARAM_SCOPE: &str = "scope";
const PARAM_CODE: &str = "code";
const PARAM_GRANT_TYPE: &str = "grant_type";

/// Application option that can be supplied to an auth query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthOption {
    ClientId,
    ClientSecret,
    RedirectUri,
    Scope,
    Version,
}

impl AuthOption {
    fn param(self) -> &'static str {
        match self {
            Self::ClientId => PARAM_CLIENT_ID,
            Self::ClientSecret => PARAM_CLIENT_SECRET,
            Self::RedirectUri => PARAM_REDIRECT_URI,
            Self::Scope => PARAM_SCOPE,
            Self::Version => PARAM_VERSION,
        }
    }
}

impl VkClient {
    /// URL of the authorization dialog.
    ///
    /// Caller parameters come first; `client_id`, `redirect_uri`, `scope` and
    /// `v` are then filled from the application credentials unless already
    /// present.
    ///
    /// # Errors
    ///
    /// `VkError::MissingOption` if a required option is neither supplied nor
    /// configured.
    pub fn authorization_url(&self, extra: Params) -> Result<String, VkError> {
        let query = self.supply_options(
            extra,
            &[AuthOption::ClientId, AuthOption::RedirectUri, AuthOption::Scope, AuthOption::Version],
        )?;

        let mut url = Url::parse(&self.inner.endpoints.auth)
            .map_err(|err| VkError::Config(format!("invalid auth endpoint: {err}")))?;
        url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        Ok(url.to_string())
    }

    /// Exchange an authorization code for a token (authorization code flow).
    ///
    /// # Errors
    ///
    /// `VkError::InvalidInput` for an empty code (nothing is sent),
    /// `VkError::MissingOption` for missing credentials, `VkError::Auth` when
    /// the token endpoint rejects the exchange.
    #[instrument(skip_all)]
    pub async fn site_auth(&self, code: &str) -> Result<Session, VkError> {
        if code.trim().is_empty() {
            return Err(VkError::InvalidInput(
                "authorization code flow requires a non-empty code".into(),
            ));
        }

        let mut params = Params::new();
        params.insert(PARAM_CODE.into(), Value::from(code));
        let query = self.supply_options(
            params,
            &[
                AuthOption::ClientId,
                AuthOption::ClientSecret,
                AuthOption::RedirectUri,
                AuthOption::Version,
            ],
        )?;

        self.exchange(query).await
    }

    /// Obtain an application token (client credentials flow).
    ///
    /// # Errors
    ///
    /// `VkError::MissingOption` for missing credentials, `VkError::Auth` when
    /// the token endpoint rejects the exchange.
    #[instrument(skip_all)]
    pub async fn server_auth(&self) -> Result<Session, VkError> {
        let mut params = Params::new();
        params.insert(PARAM_GRANT_TYPE.into(), Value::from("client_credentials"));
        let query = self.supply_options(
            params,
            &[AuthOption::ClientId, AuthOption::ClientSecret, AuthOption::Version],
        )?;

        self.exchange(query).await
    }

    fn supply_options(
        &self,
        params: Params,
        options: &[AuthOption],
    ) -> Result<Vec<(String, String)>, VkError> {
        let mut query = encode_form(&params);

        for option in options {
            let name = option.param();
            if query.iter().any(|(key, value)| key == name && !value.is_empty()) {
                continue;
            }
            let value = self
                .app_option(*option)
                .ok_or_else(|| VkError::MissingOption(name.to_string()))?;
            query.retain(|(key, _)| key != name);
            query.push((name.to_string(), value));
        }

        Ok(query)
    }

    fn app_option(&self, option: AuthOption) -> Option<String> {
        let app = &self.inner.app;
        let value = match option {
            AuthOption::ClientId => app.client_id.clone(),
            AuthOption::ClientSecret => app.client_secret.clone(),
            AuthOption::RedirectUri => app.redirect_uri.clone(),
            AuthOption::Scope => Some(app.scope.to_string()),
            AuthOption::Version => Some(app.api_version.clone()),
        };
        value.filter(|v| !v.is_empty())
    }

    async fn exchange(&self, query: Vec<(String, String)>) -> Result<Session, VkError> {
        let http = &self.inner.http;
        let request = http.request(Method::GET, &self.inner.endpoints.token).query(&query);

        let response = http.send(request).await.map_err(|err| {
            warn!(error = %err, "token request failed");
            VkError::Auth(err.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| VkError::Auth(format!("failed to read token response: {err}")))?;
        let parsed: Option<Value> = serde_json::from_str(&body).ok();

        if let Some(message) = parsed.as_ref().and_then(token_error) {
            warn!(%status, error = %message, "token endpoint rejected credentials");
            return Err(VkError::Auth(message));
        }
        if !status.is_success() {
            warn!(%status, "token endpoint returned non-success status");
            return Err(VkError::Auth(status_message(status)));
        }

        let token: TokenResponse = parsed
            .ok_or_else(|| VkError::Auth("token response is not JSON".into()))
            .and_then(|value| {
                serde_json::from_value(value)
                    .map_err(|err| VkError::Auth(format!("malformed token response: {err}")))
            })?;

        let session = Session::from_token_response(token, Utc::now());
        info!(user_id = ?session.user_id, expires = ?session.expires, "access token obtained");
        self.set_session(session.clone());

        Ok(session)
    }
}

/// `{"error": "...", "error_description": "..."}` body of a failed exchange.
fn token_error(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    let code = error.as_str().map_or_else(|| error.to_string(), str::to_string);
    let message = match body.get("error_description").and_then(Value::as_str) {
        Some(description) => format!("{code}: {description}"),
        None => code,
    };
    Some(message)
}
