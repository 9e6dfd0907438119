//! Client configuration.

use std::time::Duration;
use url::Url;

/// Public API endpoint, including the version segment.
const DEFAULT_BASE_URL: &str = "https://api.truthordarebot.xyz/v1";

/// Per-request deadline applied to every call.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for a [`TruthOrDareClient`](crate::TruthOrDareClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API.
    base_url: Url,
    /// Per-request timeout.
    timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration pointing at the public API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom base URL (e.g. a mock server in tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets a custom request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("hardcoded base URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new();

        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_builder_overrides() {
        let base = Url::parse("http://127.0.0.1:9000/v1").unwrap();
        let config = ClientConfig::new()
            .with_base_url(base.clone())
            .with_timeout(Duration::from_secs(1));

        assert_eq!(config.base_url(), &base);
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
