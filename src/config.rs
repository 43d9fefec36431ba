//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::AuthError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_PROVIDERS: &[&str] = &["local"];
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const TOKEN_DIR: &str = "authgate";
const TOKEN_FILE: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub token_path: PathBuf,
    pub providers: Vec<String>,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `AUTH_API_URL`: default `http://127.0.0.1:3000`
    /// - `AUTH_TOKEN_PATH`: default `<config dir>/authgate/token`
    /// - `AUTH_PROVIDERS`: comma-separated, default `local`
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUTH_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the API URL is empty or not http(s).
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_env_with_api_url(None)
    }

    /// [`ClientConfig::from_env`], but `api_url` (when given) replaces
    /// `AUTH_API_URL` before anything is validated.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the effective API URL is empty or not http(s).
    pub fn from_env_with_api_url(api_url: Option<&str>) -> Result<Self, AuthError> {
        let raw_url = match api_url {
            Some(url) => url.to_owned(),
            None => std::env::var("AUTH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
        };
        let api_url = normalize_api_url(&raw_url)?;
        let token_path = std::env::var("AUTH_TOKEN_PATH").map_or_else(|_| default_token_path(), PathBuf::from);
        let providers = parse_providers(std::env::var("AUTH_PROVIDERS").ok().as_deref());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("AUTH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("AUTH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_url, token_path, providers, timeouts })
    }

    /// Config pointing at `api_url` with every other field defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if `api_url` is empty or not http(s).
    pub fn for_api_url(api_url: &str) -> Result<Self, AuthError> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            token_path: default_token_path(),
            providers: parse_providers(None),
            timeouts: Timeouts::default(),
        })
    }
}

/// Trim whitespace and trailing slashes, then require an http(s) scheme.
pub fn normalize_api_url(raw: &str) -> Result<String, AuthError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::Config("AUTH_API_URL is empty".into()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AuthError::Config(format!("AUTH_API_URL must be http(s): {trimmed}")));
    }
    Ok(trimmed.to_owned())
}

fn parse_providers(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if parsed.is_empty() {
        return DEFAULT_PROVIDERS.iter().map(|name| (*name).to_owned()).collect();
    }
    parsed
}

fn default_token_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(std::env::temp_dir);
    path.push(TOKEN_DIR);
    path.push(TOKEN_FILE);
    path
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
