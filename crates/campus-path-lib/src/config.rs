//! Client configuration

use crate::query::StaleResponsePolicy;
use std::time::Duration;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Environment variable overriding the path service base URL
pub const BASE_URL_ENV: &str = "CAMPUS_PATH_API_URL";

/// Configuration for talking to the path service
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the path service, without the `/api/...` suffix
    pub base_url: String,

    /// Transport-level timeout; `None` waits for the underlying connection to fail
    pub request_timeout: Option<Duration>,

    /// What to do with a response that settles after a newer query was issued
    pub stale_policy: StaleResponsePolicy,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with default settings otherwise
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Build the full URL of an API endpoint such as `/api/nodes`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            stale_policy: StaleResponsePolicy::default(),
        }
    }
}
