//! Shared helpers for infra integration tests

use std::collections::HashMap;

use serde_json::json;
use vkclient_domain::Config;
use vkclient_infra::VkClient;
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

/// Serves `0..total` as a paginated list, honouring `offset` and `count` up
/// to `page_size` items per response.
pub struct PagedList {
    pub total: u64,
    pub page_size: u64,
}

impl Respond for PagedList {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let form = form_params(request);
        let offset = form.get("offset").and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
        let count = form
            .get("count")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(self.page_size)
            .min(self.page_size);
        let end = offset.saturating_add(count).min(self.total);
        let items: Vec<u64> = (offset..end).collect();

        ResponseTemplate::new(200)
            .set_body_json(json!({"response": {"count": self.total, "items": items}}))
    }
}

/// Decode a form-encoded request body.
pub fn form_params(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body).into_owned().collect()
}

/// Config pointing every endpoint at `server`.
pub fn config_for(server: &MockServer, interval_ms: u64) -> Config {
    let mut config = Config::default();
    config.endpoints.methods = format!("{}/method", server.uri());
    config.endpoints.token = format!("{}/access_token", server.uri());
    config.options.interval_ms = interval_ms;
    config
}

pub fn client_for(server: &MockServer, interval_ms: u64) -> VkClient {
    VkClient::new(config_for(server, interval_ms)).expect("client should build")
}
