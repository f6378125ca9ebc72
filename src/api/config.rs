//! Connection settings for the booking API. Values are public; do not store
//! secrets here.

use std::time::Duration;

/// Base URL used when nothing is configured: the local development backend.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    /// No timeout unless one is configured; a stalled call waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
            user_agent: crate::APP_USER_AGENT.to_string(),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a URL from the configured base URL and the provided path.
    pub fn build_url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }
}

/// Builds a URL from an explicit base URL and the provided path.
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
