//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `VKCLIENT_CLIENT_ID` is missing, falls back to loading from file
//! 3. Probes the working directory and the executable's directory
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `VKCLIENT_CLIENT_ID`: Application id (required for the env path)
//! - `VKCLIENT_CLIENT_SECRET`: Application secret
//! - `VKCLIENT_REDIRECT_URI`: Redirect URI of the authorization dialog
//! - `VKCLIENT_SCOPE`: Comma-separated permission names or a numeric mask
//! - `VKCLIENT_API_VERSION`: API version sent as `v`
//! - `VKCLIENT_INTERVAL_MS`: Minimum spacing between method calls
//! - `VKCLIENT_TIMEOUT_SECS`: HTTP timeout per request
//! - `VKCLIENT_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order), first in the current
//! working directory and then next to the executable:
//! 1. `vkclient.toml`, `vkclient.json`
//! 2. `config.toml`, `config.json`

use std::path::{Path, PathBuf};

use vkclient_domain::{Config, Result, Scope, VkError};

const CONFIG_FILE_NAMES: &[&str] =
    &["vkclient.toml", "vkclient.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `VkError::Config` if neither the environment nor any file yields
/// a valid configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `VKCLIENT_CLIENT_ID` is required; everything else keeps its default
/// when unset.
///
/// # Errors
/// Returns `VkError::Config` if the client id is missing or a value cannot be
/// parsed.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.app.client_id = Some(env_var("VKCLIENT_CLIENT_ID")?);
    config.app.client_secret = std::env::var("VKCLIENT_CLIENT_SECRET").ok();
    config.app.redirect_uri = std::env::var("VKCLIENT_REDIRECT_URI").ok();

    if let Ok(scope) = std::env::var("VKCLIENT_SCOPE") {
        config.app.scope = scope
            .parse::<Scope>()
            .map_err(|e| VkError::Config(format!("Invalid scope: {}", e)))?;
    }
    if let Ok(version) = std::env::var("VKCLIENT_API_VERSION") {
        config.app.api_version = version;
    }
    if let Ok(interval) = std::env::var("VKCLIENT_INTERVAL_MS") {
        config.options.interval_ms = interval
            .parse::<u64>()
            .map_err(|e| VkError::Config(format!("Invalid call interval: {}", e)))?;
    }
    if let Ok(timeout) = std::env::var("VKCLIENT_TIMEOUT_SECS") {
        config.options.timeout_secs = timeout
            .parse::<u64>()
            .map_err(|e| VkError::Config(format!("Invalid timeout: {}", e)))?;
    }
    config.logging.json = env_bool("VKCLIENT_LOG_JSON", false);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `VkError::Config` if the file is missing, unreadable, or invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VkError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            VkError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VkError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, choosing the format by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| VkError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VkError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(VkError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    probe_dirs(&dirs)
}

fn probe_dirs(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `VkError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| VkError::Config(format!("Missing required environment variable: {}", key)))
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
