//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a client from it.

use std::io::Write;
use std::time::Duration;

use tempfile::Builder;
use vkclient_domain::Permission;
use vkclient_infra::{config, VkClient};

#[test]
fn test_toml_file_configures_client() {
    let toml_content = r#"
[app]
client_id = "51234"
redirect_uri = "https://oauth.vk.com/blank.html"
scope = "offline,wall"
api_version = "5.131"

[options]
interval_ms = 500
timeout_secs = 5
user_agent = "vkcollect/0.1"

[logging]
filter = "vkclient_infra=debug"
json = true
"#;

    let mut temp_file =
        Builder::new().suffix(".toml").tempfile().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("Failed to load config from TOML file");

    assert!(config.app.scope.contains(Permission::Wall));
    assert!(config.logging.json);

    let client = VkClient::new(config).expect("client from config");
    assert_eq!(client.scheduler().interval(), Duration::from_millis(500));
    assert_eq!(client.app().api_version, "5.131");
    assert!(client.has_in_scope("wall.post"));
    assert!(!client.has_in_scope("photos.save"));
}

#[test]
fn test_empty_json_file_uses_defaults() {
    let mut temp_file =
        Builder::new().suffix(".json").tempfile().expect("Failed to create temp file");
    temp_file.write_all(b"{}").expect("Failed to write to temp file");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("Failed to load config from JSON file");

    assert_eq!(config, vkclient_domain::Config::default());
}
