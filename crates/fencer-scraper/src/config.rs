//! Settings for the fencing-tracker client, derived from [`AppConfig`].

use std::time::Duration;

use fencer_core::AppConfig;

use crate::retry::RetryPolicy;

/// Results requested per search call.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Site origin without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub retry: RetryPolicy,
    pub search_limit: u32,
}

impl ScraperConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            user_agent: config.user_agent.clone(),
            retry: RetryPolicy::new(
                config.max_attempts,
                Duration::from_millis(config.retry_backoff_ms),
            ),
            search_limit: config.search_limit,
        }
    }

    /// Production defaults pointed at `base_url`, for tests and one-off tools.
    #[must_use]
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            request_timeout: Duration::from_secs(30),
            user_agent: fencer_core::config::DEFAULT_USER_AGENT.to_owned(),
            retry: RetryPolicy::default(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use fencer_core::Environment;

    use super::*;

    #[test]
    fn built_from_app_config() {
        let app = AppConfig {
            env: Environment::Test,
            base_url: "http://127.0.0.1:9000/".to_owned(),
            log_level: "debug".to_owned(),
            cache_path: PathBuf::from("cache.db"),
            cache_ttl_secs: 60,
            request_timeout_secs: 5,
            user_agent: "test-agent".to_owned(),
            max_attempts: 3,
            retry_backoff_ms: 10,
            search_limit: 7,
        };

        let config = ScraperConfig::from_app_config(&app);
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff, Duration::from_millis(10));
        assert_eq!(config.search_limit, 7);
    }
}
