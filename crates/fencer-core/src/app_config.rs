use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings, loaded once at startup and handed to each
/// component at construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Origin of the fencing-tracker site, without a trailing slash.
    pub base_url: String,
    pub log_level: String,
    /// SQLite file backing the TTL cache and the tracked-fencer list.
    pub cache_path: PathBuf,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Total attempts per request, including the first one.
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    pub search_limit: u32,
}
