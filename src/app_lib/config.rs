//! Client configuration: API base URL, request timeout and the location of the
//! persisted session file. Values come from explicit overrides (CLI flags) first,
//! then environment variables, then local development defaults. Configuration
//! values are public; do not store secrets here.

use super::errors::AppError;
use std::{env, path::PathBuf, time::Duration};
use url::Url;

/// Local development backend used when no base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
/// Default request timeout (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

pub const ENV_API_URL: &str = "SHADOWSENTRY_API_URL";
pub const ENV_TIMEOUT_MS: &str = "SHADOWSENTRY_TIMEOUT_MS";
pub const ENV_STORE: &str = "SHADOWSENTRY_STORE";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub timeout: Duration,
    pub store_path: PathBuf,
}

/// Optional values that take precedence over the defaults.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub store_path: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Reads overrides from `SHADOWSENTRY_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var(ENV_API_URL)
                .ok()
                .and_then(|value| normalize_value(&value)),
            timeout_ms: env::var(ENV_TIMEOUT_MS)
                .ok()
                .and_then(|value| normalize_value(&value))
                .and_then(|value| value.parse().ok()),
            store_path: env::var(ENV_STORE)
                .ok()
                .and_then(|value| normalize_value(&value))
                .map(PathBuf::from),
        }
    }
}

impl AppConfig {
    /// Loads config from the environment.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the configured base URL is not a valid http(s) URL.
    pub fn load() -> Result<Self, AppError> {
        Self::from_overrides(ConfigOverrides::from_env())
    }

    /// Builds config from explicit overrides, falling back to defaults.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the base URL is not a valid http(s) URL.
    pub fn from_overrides(overrides: ConfigOverrides) -> Result<Self, AppError> {
        let base = overrides
            .api_base_url
            .as_deref()
            .and_then(normalize_value)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            api_base_url: parse_base_url(&base)?,
            timeout: Duration::from_millis(
                overrides
                    .timeout_ms
                    .filter(|ms| *ms > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            ),
            store_path: overrides.store_path.unwrap_or_else(default_store_path),
        })
    }
}

fn parse_base_url(value: &str) -> Result<Url, AppError> {
    let url = Url::parse(value)
        .map_err(|err| AppError::Config(format!("Invalid API base URL {value}: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::Config(format!(
                "Unsupported API base URL scheme: {scheme}"
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(AppError::Config(format!(
            "API base URL has no host: {value}"
        )));
    }

    Ok(url)
}

fn default_store_path() -> PathBuf {
    home::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".shadowsentry")
        .join("session.json")
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
