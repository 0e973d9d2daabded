//! Configuration loader
//!
//! Loads the client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment when one exists
//! 2. Attempts to load from environment variables
//! 3. If `SITEDESK_API_URL` is missing, falls back to loading from file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `SITEDESK_API_URL`: Backend base URL (required)
//! - `SITEDESK_API_TIMEOUT_SECS`: Request timeout in seconds
//! - `SITEDESK_API_MAX_ATTEMPTS`: Transport attempts per request
//! - `SITEDESK_LOGOUT_REDIRECT_MS`: Delay before the post-logout redirect
//! - `SITEDESK_LOGIN_ROUTE`: Route the navigator is sent to on logout
//! - `SITEDESK_MATCH_ERROR_MESSAGES`: Match credential errors by message
//!   (true/false)
//! - `SITEDESK_KEYCHAIN_SERVICE`: Keychain service name for stored tokens
//! - `SITEDESK_LOG_FILTER`: Default tracing filter directive
//! - `SITEDESK_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./sitedesk.{json,toml}` then `./config.{json,toml}`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use sitedesk_domain::{ClientConfig, Result, SiteDeskError};

const API_URL_VAR: &str = "SITEDESK_API_URL";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["sitedesk.json", "sitedesk.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// Uses environment variables when `SITEDESK_API_URL` is set, and a config
/// file otherwise. Once the variable is set, invalid environment values are
/// reported instead of being replaced by a file.
///
/// # Errors
/// Returns `SiteDeskError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The base URL is not a valid URL
pub fn load() -> Result<ClientConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    if std::env::var_os(API_URL_VAR).is_none() {
        tracing::debug!("{API_URL_VAR} not set, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only `SITEDESK_API_URL` is required; every other variable overrides the
/// corresponding default when set.
///
/// # Errors
/// Returns `SiteDeskError::Config` if the base URL is missing or invalid, or
/// a numeric variable does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::with_base_url(env_var(API_URL_VAR)?);

    if let Some(timeout) = env_parse("SITEDESK_API_TIMEOUT_SECS")? {
        config.api.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parse::<usize>("SITEDESK_API_MAX_ATTEMPTS")? {
        config.api.max_attempts = attempts.max(1);
    }
    if let Some(delay) = env_parse("SITEDESK_LOGOUT_REDIRECT_MS")? {
        config.session.logout_redirect_delay_ms = delay;
    }
    if let Ok(route) = std::env::var("SITEDESK_LOGIN_ROUTE") {
        config.session.login_route = route;
    }
    config.session.match_error_messages =
        env_bool("SITEDESK_MATCH_ERROR_MESSAGES", config.session.match_error_messages);
    if let Ok(service) = std::env::var("SITEDESK_KEYCHAIN_SERVICE") {
        config.storage.keychain_service = service;
    }
    if let Ok(filter) = std::env::var("SITEDESK_LOG_FILTER") {
        config.logging.filter = filter;
    }
    config.logging.json = env_bool("SITEDESK_LOG_JSON", config.logging.json);

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SiteDeskError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SiteDeskError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SiteDeskError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SiteDeskError::Config(format!("Failed to read config file: {e}")))?;

    validate(parse_config(&contents, &config_path)?)
}

/// Parse configuration from string content, by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SiteDeskError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SiteDeskError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SiteDeskError::Config(format!("Unsupported config format: {extension}"))),
    }
}

fn validate(config: ClientConfig) -> Result<ClientConfig> {
    let url = url::Url::parse(&config.api.base_url).map_err(|e| {
        SiteDeskError::Config(format!("Invalid API base URL '{}': {e}", config.api.base_url))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SiteDeskError::Config(format!(
            "API base URL must be http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SiteDeskError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| SiteDeskError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map_or(default, |s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
