//! Configuration module
//!
//! Client-side settings: where the catalog API lives, how long requests may
//! take and how long cached reads stay fresh.

use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const PROFILE_STALE_SECS: u64 = 5 * 60;
const QUERY_STALE_SECS: u64 = 60;

/// Settings for the API client and the query cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    /// Freshness window for the current user's profile.
    pub profile_stale_time: Duration,
    /// Freshness window for every other read.
    pub query_stale_time: Duration,
    /// Bearer token handed out by the identity provider, if any.
    pub api_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            profile_stale_time: Duration::from_secs(PROFILE_STALE_SECS),
            query_stale_time: Duration::from_secs(QUERY_STALE_SECS),
            api_token: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(&api_url.into()),
            ..Default::default()
        }
    }

    /// Load from environment: ACADEMY_API_URL (or API_URL), ACADEMY_API_TIMEOUT_SECS,
    /// ACADEMY_PROFILE_STALE_SECS, ACADEMY_QUERY_STALE_SECS, ACADEMY_API_TOKEN.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("ACADEMY_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let request_timeout = Duration::from_secs(
            env::var("ACADEMY_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("ACADEMY_API_TIMEOUT_SECS must be a valid number"))?,
        );

        let profile_stale_time = Duration::from_secs(
            env::var("ACADEMY_PROFILE_STALE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(PROFILE_STALE_SECS),
        );

        let query_stale_time = Duration::from_secs(
            env::var("ACADEMY_QUERY_STALE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(QUERY_STALE_SECS),
        );

        let api_token = env::var("ACADEMY_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let config = Self {
            api_url: normalize_base_url(&api_url),
            request_timeout,
            profile_stale_time,
            query_stale_time,
            api_token,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "ACADEMY_API_URL must start with http:// or https:// (got {})",
                self.api_url
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(anyhow::anyhow!(
                "ACADEMY_API_TIMEOUT_SECS must be greater than zero"
            ));
        }

        Ok(())
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
