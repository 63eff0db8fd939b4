//! Conversions from external infrastructure errors into [`VkError`].

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use vkclient_domain::VkError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VkError);

impl From<InfraError> for VkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VkError> for InfraError {
    fn from(value: VkError) -> Self {
        InfraError(value)
    }
}

trait IntoVkError {
    fn into_vk(self) -> VkError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VkError */
/* -------------------------------------------------------------------------- */

impl IntoVkError for HttpError {
    fn into_vk(self) -> VkError {
        if self.is_timeout() {
            return VkError::Transport("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return VkError::Transport("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return VkError::Transport(status_message(status));
        }

        if self.is_decode() {
            return VkError::Decode(format!("response body could not be decoded: {self}"));
        }

        VkError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_vk())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → VkError */
/* -------------------------------------------------------------------------- */

impl IntoVkError for JsonError {
    fn into_vk(self) -> VkError {
        VkError::Decode(format!("invalid JSON at line {} column {}: {self}", self.line(), self.column()))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_vk())
    }
}

/// Render a non-success status the same way for every call site.
pub(crate) fn status_message(status: reqwest::StatusCode) -> String {
    format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown status"))
}

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_maps_to_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(502)).mount(&server).await;

        let err = Client::new()
            .get(server.uri())
            .send()
            .await
            .expect("response")
            .error_for_status()
            .expect_err("502 must be an error");

        let mapped: VkError = InfraError::from(err).into();
        assert_eq!(mapped, VkError::Transport("HTTP 502 Bad Gateway".into()));
    }

    #[tokio::test]
    async fn connection_refused_maps_to_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = Client::new().get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: VkError = InfraError::from(err).into();
        assert!(matches!(mapped, VkError::Transport(_)), "got {mapped:?}");
    }

    #[test]
    fn json_error_maps_to_decode_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();

        let mapped: VkError = InfraError::from(err).into();
        match mapped {
            VkError::Decode(message) => assert!(message.contains("line 1")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn status_message_includes_reason() {
        assert_eq!(status_message(StatusCode::TOO_MANY_REQUESTS), "HTTP 429 Too Many Requests");
    }
}
