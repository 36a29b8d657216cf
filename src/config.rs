//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use reqwest::Url;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

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
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Login entry point used for forced navigation on session loss.
    pub login_path: String,
    pub timeouts: Timeouts,
    /// Identity persists to this file when set, otherwise it lives in memory.
    pub identity_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Build a config for `base_url` with every other setting at its default.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            timeouts: Timeouts::default(),
            identity_file: None,
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `REVIEW_API_BASE_URL`: default `http://127.0.0.1:8080`
    /// - `REVIEW_LOGIN_PATH`: default `/login`
    /// - `REVIEW_REQUEST_TIMEOUT_SECS`: default 30
    /// - `REVIEW_CONNECT_TIMEOUT_SECS`: default 10
    /// - `REVIEW_IDENTITY_FILE`: persist identity to this JSON file
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for an invalid base URL or login path.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("REVIEW_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let login_path = parse_login_path(std::env::var("REVIEW_LOGIN_PATH").ok().as_deref())?;
        let timeouts = Timeouts {
            request_secs: env_parse_u64("REVIEW_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("REVIEW_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let identity_file = std::env::var("REVIEW_IDENTITY_FILE")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self { base_url: parse_base_url(&base_url)?, login_path, timeouts, identity_file })
    }

    /// Absolute URL for an API path such as `/api/users/me`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn parse_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| ClientError::Config(format!("invalid base URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!("unsupported base URL scheme: {}", url.scheme())));
    }
    Ok(trimmed.to_owned())
}

fn parse_login_path(raw: Option<&str>) -> Result<String, ClientError> {
    let path = raw.map_or(DEFAULT_LOGIN_PATH, str::trim);
    if !path.starts_with('/') {
        return Err(ClientError::Config(format!("login path must start with '/': {path}")));
    }
    Ok(path.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
