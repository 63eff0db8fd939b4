//! Remote call invocation
//!
//! [`RemoteInvoker`] performs exactly one method call and hands back the raw
//! response envelope. [`unwrap_envelope`] turns that envelope into either the
//! `response` value or a [`VkError`].

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use vkclient_domain::constants::{ENVELOPE_ERROR, ENVELOPE_RESPONSE};
use vkclient_domain::{Params, VkError};

use crate::errors::conversions::status_message;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Performs one remote method call
///
/// Implementations must not retry and must not pace; both concerns live in
/// the client.
#[async_trait]
pub trait RemoteInvoker: Send + Sync {
    /// Invoke `method` with `params` and return the raw JSON envelope.
    async fn invoke(&self, method: &str, params: &Params) -> Result<Value, VkError>;
}

/// Production invoker: form-encoded POST to `{methods_endpoint}/{method}`
#[derive(Debug, Clone)]
pub struct HttpInvoker {
    http: HttpClient,
    methods_endpoint: String,
}

impl HttpInvoker {
    pub fn new(http: HttpClient, methods_endpoint: impl Into<String>) -> Self {
        Self { http, methods_endpoint: methods_endpoint.into() }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.methods_endpoint.trim_end_matches('/'), method)
    }
}

#[async_trait]
impl RemoteInvoker for HttpInvoker {
    async fn invoke(&self, method: &str, params: &Params) -> Result<Value, VkError> {
        let url = self.method_url(method);
        let form = encode_form(params);

        let response = self.http.send(self.http.request(Method::POST, &url).form(&form)).await?;

        let status = response.status();
        if !status.is_success() {
            warn!(method, %status, "method call returned non-success status");
            return Err(VkError::Transport(status_message(status)));
        }

        let body = response.text().await.map_err(|err| VkError::from(InfraError::from(err)))?;
        debug!(method, bytes = body.len(), "method call completed");

        serde_json::from_str(&body).map_err(|err| InfraError::from(err).into())
    }
}

/// Flatten parameters into form pairs.
///
/// Arrays are comma-joined, booleans become `1`/`0`, `null` values are
/// dropped and nested objects are sent as JSON text.
pub fn encode_form(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| encode_value(value).map(|encoded| (key.clone(), encoded)))
        .collect()
}

fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(flag) => Some(if *flag { "1" } else { "0" }.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Array(values) => {
            Some(values.iter().filter_map(encode_value).collect::<Vec<_>>().join(","))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Interpret a response envelope.
///
/// `{"error": {...}}` becomes [`VkError::Application`] carrying the remote
/// code and message, `{"response": ...}` yields the response value, and any
/// other shape is a [`VkError::Decode`].
pub fn unwrap_envelope(envelope: Value) -> Result<Value, VkError> {
    let Value::Object(mut fields) = envelope else {
        return Err(VkError::Decode(format!("expected a JSON object envelope, got {envelope}")));
    };

    if let Some(error) = fields.remove(ENVELOPE_ERROR) {
        return Err(application_error(&error));
    }

    fields
        .remove(ENVELOPE_RESPONSE)
        .ok_or_else(|| VkError::Decode("envelope has neither \"response\" nor \"error\"".into()))
}

fn application_error(error: &Value) -> VkError {
    let code = error.get("error_code").and_then(Value::as_i64).unwrap_or(0);
    let message = error
        .get("error_msg")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());

    VkError::Application { code, message }
}
